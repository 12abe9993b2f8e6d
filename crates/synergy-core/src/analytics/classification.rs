//! # Stock Classifier
//!
//! Splits a product's available lots into aging / expiry buckets.
//!
//! ## Decision Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  current quantity <= 0 ──────────────────────────► excluded            │
//! │          │                                                             │
//! │          ▼                                                             │
//! │  expires before today ───────────────────────────► expired             │
//! │          │                                                             │
//! │          ▼                                                             │
//! │  days of supply < 15  OR  expires within 90 days ► critical_age        │
//! │          │                                                             │
//! │          ▼                                                             │
//! │  days of supply > 30 ────────────────────────────► stock_over          │
//! │          │                                                             │
//! │          ▼                                                             │
//! │  otherwise ──────────────────────────────────────► ok                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Days of supply = `current quantity / (units sold / distinct selling days)`
//! over the trailing window. With no sales the ratio is undefined and only
//! the expiry triggers apply.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Lot, ProductId};

// =============================================================================
// Rules
// =============================================================================

/// Thresholds for the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRules {
    /// Below this many days of supply a lot is critical.
    pub critical_days_of_supply: f64,
    /// Above this many days of supply a lot is overstocked.
    pub overstock_days_of_supply: f64,
    /// A lot expiring within this many days is critical.
    pub expiry_warning_days: i64,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        ClassificationRules {
            critical_days_of_supply: crate::CRITICAL_DAYS_OF_SUPPLY,
            overstock_days_of_supply: crate::OVERSTOCK_DAYS_OF_SUPPLY,
            expiry_warning_days: crate::EXPIRY_WARNING_DAYS,
        }
    }
}

/// Which bucket a lot lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockBucket {
    Expired,
    CriticalAge,
    StockOver,
    Ok,
}

// =============================================================================
// Velocity
// =============================================================================

/// Units sold per selling day over the trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalesVelocity {
    pub units_sold: u64,
    pub selling_days: u64,
}

impl SalesVelocity {
    /// Builds the velocity from one date per unit sold.
    pub fn from_sale_dates(dates: &[NaiveDate]) -> Self {
        let mut distinct: Vec<NaiveDate> = dates.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        SalesVelocity {
            units_sold: dates.len() as u64,
            selling_days: distinct.len() as u64,
        }
    }

    /// Average units per selling day. `None` without any sales.
    pub fn units_per_day(&self) -> Option<f64> {
        if self.units_sold == 0 || self.selling_days == 0 {
            return None;
        }
        Some(self.units_sold as f64 / self.selling_days as f64)
    }

    /// How many selling days `quantity` would last.
    pub fn days_of_supply(&self, quantity: i64) -> Option<f64> {
        self.units_per_day().map(|rate| quantity as f64 / rate)
    }
}

/// Buckets one lot. Lots with nothing left return `None`.
pub fn classify_lot(
    lot: &Lot,
    velocity: &SalesVelocity,
    today: NaiveDate,
    rules: &ClassificationRules,
) -> Option<StockBucket> {
    let quantity = lot.current_quantity();
    if quantity <= 0 {
        return None;
    }

    if let Some(expires_on) = lot.expires_on {
        if expires_on < today {
            return Some(StockBucket::Expired);
        }
    }

    let days_of_supply = velocity.days_of_supply(quantity);
    // past the last representable date every expiry is within the warning
    let warning_days = Days::new(rules.expiry_warning_days.max(0) as u64);
    let warning_until = today.checked_add_days(warning_days);
    let expiring_soon = lot
        .expires_on
        .is_some_and(|expires_on| warning_until.map_or(true, |limit| expires_on <= limit));

    if expiring_soon || days_of_supply.is_some_and(|d| d < rules.critical_days_of_supply) {
        return Some(StockBucket::CriticalAge);
    }

    if days_of_supply.is_some_and(|d| d > rules.overstock_days_of_supply) {
        return Some(StockBucket::StockOver);
    }

    Some(StockBucket::Ok)
}

// =============================================================================
// Result
// =============================================================================

/// Result of `classify`: units per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockClassification {
    pub product_id: ProductId,
    pub stock_over: i64,
    pub critical_age: i64,
    pub expired: i64,
    pub ok: i64,
    pub total: i64,
}

impl StockClassification {
    fn add(&mut self, bucket: StockBucket, quantity: i64) {
        match bucket {
            StockBucket::Expired => self.expired += quantity,
            StockBucket::CriticalAge => self.critical_age += quantity,
            StockBucket::StockOver => self.stock_over += quantity,
            StockBucket::Ok => self.ok += quantity,
        }
        self.total += quantity;
    }
}

/// Buckets every lot and sums the quantities.
pub fn classify_lots(
    product_id: ProductId,
    lots: &[Lot],
    velocity: &SalesVelocity,
    today: NaiveDate,
    rules: &ClassificationRules,
) -> StockClassification {
    let mut result = StockClassification {
        product_id,
        ..Default::default()
    };

    for lot in lots {
        if let Some(bucket) = classify_lot(lot, velocity, today, rules) {
            result.add(bucket, lot.current_quantity());
        }
    }

    result
}

/// Available units and their value at current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockTotals {
    pub product_id: ProductId,
    pub quantity: i64,
    pub value: crate::money::Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
