//! # Analytics Module
//!
//! The aggregation passes that turn raw rows into dashboard metrics.
//!
//! ## Pass Dependencies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   purchase ids ──► cooccurrence ──► related products (top N)           │
//! │        │                  ▲                                             │
//! │        ▼                  │                                             │
//! │   comparison ─────────────┘  side A / side B counts + delta            │
//! │                                                                         │
//! │   movements + sale dates ──► stock_history   daily balance series      │
//! │   lots + sale dates ───────► classification  aging / expiry buckets    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: rows in, result structs out.

pub mod classification;
pub mod comparison;
pub mod cooccurrence;
pub mod stock_history;

/// `round(part / whole * 100)`, rounding half away from zero.
///
/// The one rounding rule used for every percentage in the engine. Works on
/// magnitudes with integer math so `1/8` is exactly `12.5 → 13`.
///
/// Returns `None` when `whole` is zero; callers decide what that means.
///
/// ## Example
/// ```rust
/// use synergy_core::analytics::rounded_percentage;
///
/// assert_eq!(rounded_percentage(1, 3), Some(33));
/// assert_eq!(rounded_percentage(2, 3), Some(67));
/// assert_eq!(rounded_percentage(1, 8), Some(13));
/// assert_eq!(rounded_percentage(5, 0), None);
/// ```
pub fn rounded_percentage(part: u64, whole: u64) -> Option<u32> {
    if whole == 0 {
        return None;
    }
    let part = u128::from(part);
    let whole = u128::from(whole);
    let pct = (part * 200 + whole) / (whole * 2);
    Some(u32::try_from(pct).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_rounds_up() {
        // 1/200 = 0.5%
        assert_eq!(rounded_percentage(1, 200), Some(1));
        // 1/201 < 0.5%
        assert_eq!(rounded_percentage(1, 201), Some(0));
        // 5/2 = 250%
        assert_eq!(rounded_percentage(5, 2), Some(250));
    }

    #[test]
    fn test_exact_values() {
        assert_eq!(rounded_percentage(0, 7), Some(0));
        assert_eq!(rounded_percentage(7, 7), Some(100));
        assert_eq!(rounded_percentage(3, 4), Some(75));
    }
}
