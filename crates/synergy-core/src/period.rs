//! # Date Periods
//!
//! Inclusive date ranges and the predicates the store filters purchases and
//! movements by.
//!
//! ```text
//!   On(d)          ──●──                       exactly one day
//!   Between(r)     ──[■■■■■]──                 start..=end
//!   AnyOf([r1,r2]) ──[■■]────[■■■]──           union of ranges
//!   Before(d)      ■■■■■■■■■)──                strictly earlier than d
//! ```

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Date Range
// =============================================================================

/// An inclusive calendar range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", try_from = "RangeBounds")]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    start: NaiveDate,
    #[ts(as = "String")]
    end: NaiveDate,
}

/// Unchecked wire form, validated on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RangeBounds> for DateRange {
    type Error = ValidationError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        DateRange::new(bounds.start, bounds.end)
    }
}

impl DateRange {
    /// Creates a range, rejecting one that ends before it starts.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use synergy_core::period::DateRange;
    ///
    /// let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let jan3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    ///
    /// assert_eq!(DateRange::new(jan1, jan3).unwrap().len_days(), 3);
    /// assert!(DateRange::new(jan3, jan1).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidRange {
                field: "date range".to_string(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DateRange { start, end })
    }

    /// A one-day range.
    pub fn single(day: NaiveDate) -> Self {
        DateRange {
            start: day,
            end: day,
        }
    }

    /// The `days` days ending on (and including) `end`.
    ///
    /// `trailing(today, 365)` covers `today − 364 ..= today`. A window
    /// reaching past the earliest representable date starts there.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let span = u64::from(days.max(1)) - 1;
        DateRange {
            start: end.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN),
            end,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// True if `day` falls inside the range (bounds included).
    #[inline]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of calendar days covered, bounds included.
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Every calendar day in order, including days nothing happened on.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

// =============================================================================
// Date Predicate
// =============================================================================

/// Which days a query selects.
///
/// The same predicate value must be used to count sales and to collect the
/// baskets for co-occurrence, so both run over one population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum DatePredicate {
    /// Exactly this day.
    On(NaiveDate),
    /// Inside this inclusive range.
    Between(DateRange),
    /// Inside any of these ranges.
    AnyOf(Vec<DateRange>),
    /// Strictly before this day.
    Before(NaiveDate),
}

impl DatePredicate {
    /// Evaluates the predicate for one day.
    pub fn matches(&self, day: NaiveDate) -> bool {
        match self {
            DatePredicate::On(d) => day == *d,
            DatePredicate::Between(range) => range.contains(day),
            DatePredicate::AnyOf(ranges) => ranges.iter().any(|r| r.contains(day)),
            DatePredicate::Before(d) => day < *d,
        }
    }

    /// Union of two exact days, as used by the exact-date comparison.
    pub fn either_day(first: NaiveDate, second: NaiveDate) -> Self {
        DatePredicate::AnyOf(vec![DateRange::single(first), DateRange::single(second)])
    }
}

impl From<DateRange> for DatePredicate {
    fn from(range: DateRange) -> Self {
        DatePredicate::Between(range)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_include_both_bounds() {
        let range = DateRange::new(day(2024, 2, 27), day(2024, 3, 1)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![day(2024, 2, 27), day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)]
        );
        assert_eq!(range.len_days(), 4);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = DateRange::new(day(2024, 1, 2), day(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRange { .. }));
    }

    #[test]
    fn test_trailing_window() {
        let range = DateRange::trailing(day(2024, 12, 31), 365);
        assert_eq!(range.start(), day(2024, 1, 2));
        assert_eq!(range.len_days(), 365);
    }

    #[test]
    fn test_trailing_window_clamps_at_earliest_date() {
        let range = DateRange::trailing(day(2024, 12, 31), u32::MAX);
        assert_eq!(range.start(), NaiveDate::MIN);
        assert_eq!(range.end(), day(2024, 12, 31));
    }

    #[test]
    fn test_predicates() {
        let jan = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        let mar = DateRange::new(day(2024, 3, 1), day(2024, 3, 31)).unwrap();

        assert!(DatePredicate::On(day(2024, 1, 5)).matches(day(2024, 1, 5)));
        assert!(!DatePredicate::On(day(2024, 1, 5)).matches(day(2024, 1, 6)));

        let union = DatePredicate::AnyOf(vec![jan, mar]);
        assert!(union.matches(day(2024, 3, 15)));
        assert!(!union.matches(day(2024, 2, 15)));

        let before = DatePredicate::Before(day(2024, 1, 1));
        assert!(before.matches(day(2023, 12, 31)));
        assert!(!before.matches(day(2024, 1, 1)));

        let either = DatePredicate::either_day(day(2024, 1, 1), day(2024, 1, 3));
        assert!(either.matches(day(2024, 1, 3)));
        assert!(!either.matches(day(2024, 1, 2)));
    }

    #[test]
    fn test_deserialize_validates_bounds() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-02"}"#).unwrap();
        assert_eq!(ok.len_days(), 2);

        let reversed =
            serde_json::from_str::<DateRange>(r#"{"start":"2024-01-02","end":"2024-01-01"}"#);
        assert!(reversed.is_err());
    }
}
