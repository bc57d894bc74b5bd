//! Table cell values.
//!
//! Ingested task data is loosely typed: dates arrive as `DD/MM/YYYY` strings,
//! ISO dates or JS-style timestamps, hours as numbers or text, and "no value"
//! is spelled several ways (`""`, `"None"`, `"nan"`). All of that is
//! normalized here, at the boundary, so the engine only ever sees
//! [`Cell::Empty`] for a missing value.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder strings that mean "no value".
pub const EMPTY_SENTINELS: [&str; 3] = ["", "None", "nan"];

const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// A single value in a [`TaskTable`](super::TaskTable).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing value.
    #[default]
    Empty,
    /// Free text (never one of the [`EMPTY_SENTINELS`]).
    Text(String),
    /// Numeric value (never NaN).
    Number(f64),
    /// Calendar date.
    Date(NaiveDate),
}

impl Cell {
    /// Builds a cell from raw text, mapping sentinels to [`Cell::Empty`].
    pub fn from_text(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        if EMPTY_SENTINELS.contains(&trimmed) {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    /// Builds a numeric cell. NaN becomes [`Cell::Empty`].
    pub fn from_number(value: f64) -> Self {
        if value.is_nan() {
            Self::Empty
        } else {
            Self::Number(value)
        }
    }

    /// Whether the cell holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Interprets the cell as a calendar date.
    ///
    /// Returns `None` for empty, numeric, or unparseable cells.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(s) => parse_date(s),
            Self::Empty | Self::Number(_) => None,
        }
    }

    /// Interprets the cell as an effort estimate in hours.
    ///
    /// Accepts a decimal comma in text (`"7,5"`). Non-finite values are
    /// treated as missing.
    pub fn as_hours(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
            Self::Empty | Self::Date(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Interprets the cell as a label (resource name, group key).
    pub fn as_label(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<NaiveDate> for Cell {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<Option<NaiveDate>> for Cell {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(Self::Empty, Self::Date)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::from_number(value)
    }
}

impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Self::from_text(raw)
    }
}

impl From<String> for Cell {
    fn from(raw: String) -> Self {
        Self::from_text(raw)
    }
}

/// Parses a date-like string into a calendar date.
///
/// Tries day-first CSV dates, ISO dates, ISO date-times and RFC 3339
/// timestamps, in that order. Time-of-day is discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}
