//! Working-day calendar.
//!
//! Classifies dates as working or non-working and converts an effort
//! estimate into the span of working days it occupies.
//!
//! # Working Days
//! A date is a working day iff it is not a Saturday, not a Sunday, and not
//! in the holiday set.
//!
//! # Effort Model
//! One working day holds [`HOURS_PER_DAY`] hours. The number of days a task
//! occupies is `max(1, rounding(hours / 8))`, where the rounding policy is
//! [`DayRounding::Ceil`] unless configured otherwise. A span starts on the
//! first working day at or after the base date and ends on the working day
//! reached after stepping over `days - 1` further working days. Both ends are
//! always working days; non-working days in between are jumped over.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::{Cell, Span};
use crate::error::PlanError;

/// Hours in one working day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Longest span, in working days, the calendar will lay out (about forty
/// years). Larger efforts have no span.
pub const MAX_SPAN_WORKING_DAYS: u32 = 10_000;

/// Public holidays keyed by date, with a display label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySet {
    days: BTreeMap<NaiveDate, String>,
}

impl HolidaySet {
    /// Creates an empty holiday set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a holiday set from `YYYY-MM-DD` keys.
    ///
    /// # Errors
    /// Returns [`PlanError::InvalidHoliday`] for the first key that is not
    /// an ISO date.
    pub fn from_iso_map<I, K, V>(entries: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, label) in entries {
            let key = key.as_ref();
            let date = NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
                .map_err(|_| PlanError::InvalidHoliday(key.to_string()))?;
            set.insert(date, label);
        }
        Ok(set)
    }

    /// Adds a holiday (builder form).
    pub fn with_holiday(mut self, date: NaiveDate, label: impl Into<String>) -> Self {
        self.insert(date, label);
        self
    }

    /// Adds or relabels a holiday.
    pub fn insert(&mut self, date: NaiveDate, label: impl Into<String>) {
        self.days.insert(date, label.into());
    }

    /// Whether `date` is a holiday.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Label of a holiday.
    pub fn label(&self, date: NaiveDate) -> Option<&str> {
        self.days.get(&date).map(String::as_str)
    }

    /// Number of holidays.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether there are no holidays.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Holidays in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.days.iter().map(|(d, l)| (*d, l.as_str()))
    }
}

/// How fractional working days are bucketed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayRounding {
    /// Any partial day counts as a full day (9h → 2 days).
    #[default]
    Ceil,
    /// Round to nearest, ties to even (9h → 1 day, 12h → 2, 20h → 2).
    NearestEven,
}

impl DayRounding {
    /// Working days needed for `hours` of effort.
    ///
    /// Returns `None` when `hours` is not a positive finite number.
    pub fn working_days(self, hours: f64) -> Option<u32> {
        if !hours.is_finite() || hours <= 0.0 {
            return None;
        }
        let fractional = hours / HOURS_PER_DAY;
        let days = match self {
            Self::Ceil => fractional.ceil(),
            Self::NearestEven => fractional.round_ties_even(),
        };
        // Saturating cast; oversized efforts are refused by the span ceiling.
        Some((days as u32).max(1))
    }
}

/// Weekend- and holiday-aware date arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingCalendar {
    holidays: HolidaySet,
    rounding: DayRounding,
}

impl WorkingCalendar {
    /// Creates a calendar with the default rounding policy.
    pub fn new(holidays: HolidaySet) -> Self {
        Self {
            holidays,
            rounding: DayRounding::default(),
        }
    }

    /// Sets the rounding policy.
    pub fn with_rounding(mut self, rounding: DayRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// The holiday set.
    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// The rounding policy.
    pub fn rounding(&self) -> DayRounding {
        self.rounding
    }

    /// Whether `date` is Saturday or Sunday.
    #[inline]
    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Whether `date` is a holiday.
    #[inline]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(date)
    }

    /// Whether a date-like cell is a holiday.
    ///
    /// Empty or unparseable values are never holidays.
    pub fn is_holiday_value(&self, value: &Cell) -> bool {
        value.as_date().is_some_and(|d| self.is_holiday(d))
    }

    /// Whether `date` is a working day.
    #[inline]
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !Self::is_weekend(date) && !self.is_holiday(date)
    }

    /// First working day at or after `date`.
    ///
    /// `None` only if the search runs off the end of the representable range.
    pub fn first_working_day_from(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut day = date;
        while !self.is_working_day(day) {
            day = day.succ_opt()?;
        }
        Some(day)
    }

    /// First working day strictly after `date`.
    pub fn next_working_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.first_working_day_from(date.succ_opt()?)
    }

    /// Span of working days occupied by `hours` of effort starting at `base`.
    ///
    /// Returns `None` when `hours` is not positive, when the effort needs more
    /// than [`MAX_SPAN_WORKING_DAYS`], or when the span would run past the
    /// last representable date.
    pub fn working_date_span(&self, base: NaiveDate, hours: f64) -> Option<Span> {
        let days = self.rounding.working_days(hours)?;
        if days > MAX_SPAN_WORKING_DAYS {
            return None;
        }
        let start = self.first_working_day_from(base)?;
        let mut end = start;
        for _ in 1..days {
            end = self.next_working_day(end)?;
        }
        Some(Span::new(start, end))
    }

    /// [`working_date_span`](Self::working_date_span) over table cells.
    ///
    /// Returns `None` for an empty or unparseable base date, or missing hours.
    pub fn working_date_span_value(&self, base: &Cell, hours: &Cell) -> Option<Span> {
        self.working_date_span(base.as_date()?, hours.as_hours()?)
    }

    /// Number of working days in a closed span.
    pub fn working_days_in(&self, span: &Span) -> usize {
        span.start
            .iter_days()
            .take_while(|d| *d <= span.end)
            .filter(|d| self.is_working_day(*d))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-06 is a Monday.
    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn plain() -> WorkingCalendar {
        WorkingCalendar::default()
    }

    #[test]
    fn test_weekend_and_holiday() {
        let cal = WorkingCalendar::new(HolidaySet::new().with_holiday(d(1, 1), "New Year"));
        assert!(WorkingCalendar::is_weekend(d(1, 4)));
        assert!(WorkingCalendar::is_weekend(d(1, 5)));
        assert!(!WorkingCalendar::is_weekend(d(1, 6)));
        assert!(cal.is_holiday(d(1, 1)));
        assert!(!cal.is_working_day(d(1, 1)));
        assert!(cal.is_working_day(d(1, 2)));
    }

    #[test]
    fn test_is_holiday_value_fails_closed() {
        let cal = WorkingCalendar::new(HolidaySet::new().with_holiday(d(7, 28), "Independence"));
        assert!(cal.is_holiday_value(&Cell::from("2025-07-28")));
        assert!(cal.is_holiday_value(&Cell::from("28/07/2025")));
        assert!(cal.is_holiday_value(&Cell::from("2025-07-28T15:00:00")));
        assert!(cal.is_holiday_value(&Cell::Date(d(7, 28))));
        assert!(!cal.is_holiday_value(&Cell::from("garbage")));
        assert!(!cal.is_holiday_value(&Cell::Empty));
        assert!(!cal.is_holiday_value(&Cell::Number(1.0)));
    }

    #[test]
    fn test_span_single_day() {
        assert_eq!(
            plain().working_date_span(d(1, 6), 8.0),
            Some(Span::single(d(1, 6)))
        );
    }

    #[test]
    fn test_span_two_days() {
        assert_eq!(
            plain().working_date_span(d(1, 6), 16.0),
            Some(Span::new(d(1, 6), d(1, 7)))
        );
    }

    #[test]
    fn test_span_partial_day_rounds_up() {
        assert_eq!(
            plain().working_date_span(d(1, 6), 9.0),
            Some(Span::new(d(1, 6), d(1, 7)))
        );
        assert_eq!(
            plain().working_date_span(d(1, 6), 1.0),
            Some(Span::single(d(1, 6)))
        );
    }

    #[test]
    fn test_span_nearest_even_rounding() {
        let cal = plain().with_rounding(DayRounding::NearestEven);
        assert_eq!(cal.working_date_span(d(1, 6), 9.0), Some(Span::single(d(1, 6))));
        // 12h = 1.5 days → 2; 20h = 2.5 days → 2.
        assert_eq!(
            cal.working_date_span(d(1, 6), 12.0),
            Some(Span::new(d(1, 6), d(1, 7)))
        );
        assert_eq!(
            cal.working_date_span(d(1, 6), 20.0),
            Some(Span::new(d(1, 6), d(1, 7)))
        );
        // Never less than one day.
        assert_eq!(cal.working_date_span(d(1, 6), 2.0), Some(Span::single(d(1, 6))));
    }

    #[test]
    fn test_span_full_week_and_wrap() {
        assert_eq!(
            plain().working_date_span(d(1, 6), 40.0),
            Some(Span::new(d(1, 6), d(1, 10)))
        );
        assert_eq!(
            plain().working_date_span(d(1, 6), 48.0),
            Some(Span::new(d(1, 6), d(1, 13)))
        );
    }

    #[test]
    fn test_span_weekend_base_moves_to_monday() {
        assert_eq!(
            plain().working_date_span(d(1, 4), 8.0),
            Some(Span::single(d(1, 6)))
        );
    }

    #[test]
    fn test_span_friday_ignores_following_holiday() {
        let cal = WorkingCalendar::new(HolidaySet::new().with_holiday(d(1, 13), "h"));
        assert_eq!(cal.working_date_span(d(1, 10), 8.0), Some(Span::single(d(1, 10))));
    }

    #[test]
    fn test_span_holiday_base_moves_forward() {
        let cal = WorkingCalendar::new(HolidaySet::new().with_holiday(d(1, 13), "h"));
        assert_eq!(cal.working_date_span(d(1, 13), 8.0), Some(Span::single(d(1, 14))));
    }

    #[test]
    fn test_span_skips_weekend_and_holiday_inside() {
        let cal = WorkingCalendar::new(HolidaySet::new().with_holiday(d(1, 13), "h"));
        // Friday + 1 more working day: Sat, Sun, holiday Monday skipped.
        assert_eq!(
            cal.working_date_span(d(1, 10), 16.0),
            Some(Span::new(d(1, 10), d(1, 14)))
        );
    }

    #[test]
    fn test_span_rejects_non_positive_hours() {
        let cal = plain();
        assert_eq!(cal.working_date_span(d(1, 6), 0.0), None);
        assert_eq!(cal.working_date_span(d(1, 6), -8.0), None);
        assert_eq!(cal.working_date_span(d(1, 6), f64::NAN), None);
    }

    #[test]
    fn test_span_from_cells() {
        let cal = plain();
        assert_eq!(
            cal.working_date_span_value(&Cell::from("06/01/2025"), &Cell::Number(8.0)),
            Some(Span::single(d(1, 6)))
        );
        assert_eq!(
            cal.working_date_span_value(&Cell::from("nope"), &Cell::Number(8.0)),
            None
        );
        assert_eq!(
            cal.working_date_span_value(&Cell::from("2025-01-06"), &Cell::Empty),
            None
        );
    }

    #[test]
    fn test_span_rejects_oversized_effort() {
        let cal = plain();
        let ceiling = f64::from(MAX_SPAN_WORKING_DAYS) * HOURS_PER_DAY;
        assert!(cal.working_date_span(d(1, 6), ceiling).is_some());
        assert_eq!(cal.working_date_span(d(1, 6), ceiling + HOURS_PER_DAY), None);
        // Positive effort, so the rounding itself still succeeds.
        assert!(cal.rounding().working_days(1e12).is_some());
        assert_eq!(cal.working_date_span(d(1, 6), 1e12), None);
    }

    #[test]
    fn test_span_stops_at_last_date() {
        let cal = plain();
        assert_eq!(cal.working_date_span(NaiveDate::MAX, 80.0), None);
    }

    #[test]
    fn test_working_days_in() {
        let cal = WorkingCalendar::new(HolidaySet::new().with_holiday(d(1, 13), "h"));
        assert_eq!(cal.working_days_in(&Span::new(d(1, 10), d(1, 14))), 2);
        assert_eq!(cal.working_days_in(&Span::new(d(1, 6), d(1, 10))), 5);
    }

    #[test]
    fn test_holidays_from_iso_map() {
        let set = HolidaySet::from_iso_map([("2025-12-25", "Christmas"), ("2025-01-01", "New Year")])
            .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.label(d(12, 25)), Some("Christmas"));
        // Date order, not insertion order.
        assert_eq!(set.iter().next().map(|(day, _)| day), Some(d(1, 1)));

        let err = HolidaySet::from_iso_map([("25/12/2025", "x")]).unwrap_err();
        assert!(matches!(err, PlanError::InvalidHoliday(k) if k == "25/12/2025"));
    }
}
