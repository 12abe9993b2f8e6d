//! # Stock Reconstructor
//!
//! Rebuilds a product's daily stock balance from movement and sale rows.
//!
//! ## Walk
//! ```text
//!   before start ──► initial = max(0, inbound − sold)
//!
//!   day      entries  outputs  balance
//!   ───────  ───────  ───────  ───────
//!   D0          10        2     initial + 8
//!   D1           0        0     unchanged      ◄── gap days still emitted
//!   D2           0       12     may go below 0 ◄── only the initial is floored
//! ```
//!
//! Value is `balance × current price`. Historical prices are not tracked, so
//! older days are valued at today's price.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::period::DateRange;
use crate::types::{Product, ProductId};

/// One day of the reconstructed series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockHistoryPoint {
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Balance at end of day.
    pub quantity: i64,
    pub entries: i64,
    pub outputs: i64,
    pub value: Money,
}

/// Result of `history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockHistory {
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub initial_stock: i64,
    pub history: Vec<StockHistoryPoint>,
}

/// Per-day inbound and sold quantities inside the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyFlows {
    entries: HashMap<NaiveDate, i64>,
    outputs: HashMap<NaiveDate, i64>,
}

impl DailyFlows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds inbound quantity on `day`.
    pub fn add_entry(&mut self, day: NaiveDate, quantity: i64) {
        *self.entries.entry(day).or_insert(0) += quantity;
    }

    /// Adds sold units on `day`.
    pub fn add_output(&mut self, day: NaiveDate, quantity: i64) {
        *self.outputs.entry(day).or_insert(0) += quantity;
    }

    pub fn entries_on(&self, day: NaiveDate) -> i64 {
        self.entries.get(&day).copied().unwrap_or(0)
    }

    pub fn outputs_on(&self, day: NaiveDate) -> i64 {
        self.outputs.get(&day).copied().unwrap_or(0)
    }
}

/// Opening balance, floored at zero.
pub fn initial_stock(inbound_before: i64, sold_before: i64) -> i64 {
    (inbound_before - sold_before).max(0)
}

/// Walks every day of `range`, carrying the balance forward.
pub fn reconstruct(
    product: &Product,
    range: DateRange,
    initial_stock: i64,
    flows: &DailyFlows,
) -> StockHistory {
    let price = product.price();
    let mut balance = initial_stock;
    let mut history = Vec::with_capacity(range.len_days());

    for date in range.days() {
        let entries = flows.entries_on(date);
        let outputs = flows.outputs_on(date);
        balance += entries - outputs;

        history.push(StockHistoryPoint {
            date,
            quantity: balance,
            entries,
            outputs,
            value: price.multiply_quantity(balance),
        });
    }

    StockHistory {
        product_id: product.id,
        product_name: product.name.clone(),
        sku: product.sku(),
        start_date: range.start(),
        end_date: range.end(),
        initial_stock,
        history,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn product() -> Product {
        Product {
            id: 3,
            name: "Leite Integral 1L".to_string(),
            price_cents: 550,
        }
    }

    #[test]
    fn test_initial_stock_floor() {
        assert_eq!(initial_stock(10, 4), 6);
        assert_eq!(initial_stock(4, 10), 0);
        assert_eq!(initial_stock(0, 0), 0);
    }

    #[test]
    fn test_gap_days_carry_balance() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 4)).unwrap();
        let mut flows = DailyFlows::new();
        flows.add_entry(day(2024, 1, 1), 10);
        flows.add_output(day(2024, 1, 1), 2);
        flows.add_output(day(2024, 1, 4), 3);

        let history = reconstruct(&product(), range, 5, &flows);
        let quantities: Vec<_> = history.history.iter().map(|p| p.quantity).collect();

        assert_eq!(history.history.len(), 4);
        assert_eq!(quantities, vec![13, 13, 13, 10]);
        assert_eq!(history.history[1].entries, 0);
        assert_eq!(history.history[1].outputs, 0);
        assert_eq!(history.history.last().map(|p| p.quantity), Some(10));
    }

    #[test]
    fn test_balance_not_floored_mid_stream() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 2)).unwrap();
        let mut flows = DailyFlows::new();
        flows.add_output(day(2024, 1, 1), 4);

        let history = reconstruct(&product(), range, 1, &flows);
        assert_eq!(history.history[0].quantity, -3);
        assert_eq!(history.history[0].value, Money::from_cents(-1650));
        assert_eq!(history.history[1].quantity, -3);
    }

    #[test]
    fn test_value_uses_current_price() {
        let range = DateRange::single(day(2024, 5, 1));
        let history = reconstruct(&product(), range, 2, &DailyFlows::new());
        assert_eq!(history.history[0].value.to_string(), "11.00");
        assert_eq!(history.sku, "3");
    }

    proptest! {
        #[test]
        fn prop_one_point_per_day(
            offset in 0i64..2000,
            span in 0i64..400,
            inbound in 0i64..500,
            sold in 0i64..500,
        ) {
            let start = day(2020, 1, 1) + chrono::Duration::days(offset);
            let end = start + chrono::Duration::days(span);
            let range = DateRange::new(start, end).unwrap();

            let opening = initial_stock(inbound, sold);
            let history = reconstruct(&product(), range, opening, &DailyFlows::new());

            prop_assert!(history.initial_stock >= 0);
            prop_assert_eq!(history.history.len() as i64, span + 1);
            prop_assert_eq!(history.history.first().map(|p| p.date), Some(start));
            prop_assert_eq!(history.history.last().map(|p| p.date), Some(end));
            prop_assert!(history.history.iter().all(|p| p.quantity == opening));
        }
    }
}
