//! Date spans and overlap detection.
//!
//! A span is the closed interval `[start, end]` of calendar days a task
//! occupies its resource. Both bounds are inclusive, so two spans that share
//! a single day conflict.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A closed date interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// First occupied day (inclusive).
    pub start: NaiveDate,
    /// Last occupied day (inclusive).
    pub end: NaiveDate,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A span covering a single day.
    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// Builds a span from two optional bounds; `None` if either is missing.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        Some(Self::new(start?, end?))
    }

    /// Calendar days covered, counting both ends.
    #[inline]
    pub fn calendar_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether a day falls within this span.
    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    /// Whether two spans share at least one day.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// Whether `candidate` overlaps any of the `existing` spans.
///
/// Existing entries are `(start, end)` pairs as read from a table; a pair
/// with a missing bound does not constrain the candidate.
pub fn has_conflict<I>(candidate: &Span, existing: I) -> bool
where
    I: IntoIterator<Item = (Option<NaiveDate>, Option<NaiveDate>)>,
{
    existing
        .into_iter()
        .filter_map(|(start, end)| Span::from_bounds(start, end))
        .any(|span| candidate.overlaps(&span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_span_basics() {
        let s = Span::new(d(6), d(10));
        assert_eq!(s.calendar_days(), 5);
        assert!(s.contains(d(6)));
        assert!(s.contains(d(10)));
        assert!(!s.contains(d(11)));
        assert_eq!(Span::single(d(6)).calendar_days(), 1);
    }

    #[test]
    fn test_overlap_inclusive() {
        let a = Span::new(d(6), d(8));
        assert!(a.overlaps(&Span::new(d(8), d(9)))); // shared end day
        assert!(a.overlaps(&Span::new(d(1), d(6)))); // shared start day
        assert!(a.overlaps(&Span::new(d(7), d(7)))); // contained
        assert!(!a.overlaps(&Span::new(d(9), d(10))));
        assert!(!a.overlaps(&Span::new(d(1), d(5))));
    }

    #[test]
    fn test_conflict_touching_single_days() {
        let day = Span::single(d(6));
        assert!(has_conflict(&day, [(Some(d(6)), Some(d(6)))]));
    }

    #[test]
    fn test_conflict_empty_existing() {
        let s = Span::new(d(6), d(7));
        assert!(!has_conflict(&s, std::iter::empty()));
    }

    #[test]
    fn test_conflict_ignores_open_bounds() {
        let s = Span::new(d(6), d(7));
        let existing = vec![(None, Some(d(7))), (Some(d(6)), None), (None, None)];
        assert!(!has_conflict(&s, existing));
    }

    #[test]
    fn test_conflict_any_match() {
        let s = Span::new(d(13), d(14));
        let existing = vec![(Some(d(6)), Some(d(7))), (Some(d(14)), Some(d(20)))];
        assert!(has_conflict(&s, existing));
    }

    #[test]
    fn test_from_bounds() {
        assert_eq!(
            Span::from_bounds(Some(d(1)), Some(d(2))),
            Some(Span::new(d(1), d(2)))
        );
        assert_eq!(Span::from_bounds(None, Some(d(2))), None);
    }
}
