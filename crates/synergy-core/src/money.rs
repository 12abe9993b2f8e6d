//! # Stock Valuation Amounts
//!
//! `Money` is a signed count of cents. Valuations multiply a unit price by
//! a unit count, so everything stays in integers:
//!
//! ```text
//!   price_cents = 410          balance = 37
//!        │                          │
//!        └──── multiply_quantity ───┘
//!                     │
//!                     ▼
//!               Money(15170)  ──► JSON: 15170   Display: "151.70"
//! ```
//!
//! Negative amounts are legal: a reconstructed balance can dip below zero
//! partway through a window, and its valuation dips with it.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Amount in cents. Serializes as a bare integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// ```rust
    /// use synergy_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1890).cents(), 1890);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Value of `units` at this unit price. `units` may be negative.
    ///
    /// ```rust
    /// use synergy_core::money::Money;
    ///
    /// let price = Money::from_cents(299);
    /// assert_eq!(price.multiply_quantity(3).cents(), 897);
    /// assert_eq!(price.multiply_quantity(-2).cents(), -598);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, units: i64) -> Self {
        Money(self.0 * units)
    }
}

/// Two decimals, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuation() {
        assert_eq!(Money::from_cents(410).multiply_quantity(37).cents(), 15170);
        assert_eq!(Money::from_cents(410).multiply_quantity(0), Money::default());
        assert_eq!(Money::from_cents(410).multiply_quantity(-3).cents(), -1230);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(15170).to_string(), "151.70");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-7).to_string(), "-0.07");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }

    #[test]
    fn test_serializes_as_plain_cents() {
        let json = serde_json::to_string(&Money::from_cents(1234)).unwrap();
        assert_eq!(json, "1234");
        let back: Money = serde_json::from_str("-80").unwrap();
        assert_eq!(back.cents(), -80);
    }
}
