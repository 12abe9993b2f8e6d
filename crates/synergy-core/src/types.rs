//! # Domain Types
//!
//! Read-only projections fetched from the data store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Product      │   │    Purchase     │   │  PurchaseLineItem    │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id             │◄┐ │  id             │◄──│  purchase_id (FK)    │  │
//! │  │  name           │ │ │  purchased_on   │   │  product_id (FK) ────┼─┐│
//! │  │  price_cents    │ │ │  customer_ref   │   │  unit_value_cents    │ ││
//! │  └─────────────────┘ │ └─────────────────┘   │  flyer, lot_ref      │ ││
//! │                      │                       └──────────────────────┘ ││
//! │                      └────────────────────────────────────────────────┘│
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ StockMovement   │   │   Lot (derived) │                             │
//! │  │  ─────────────  │   │  ─────────────  │  current quantity =         │
//! │  │  kind, quantity │──►│  product+lot    │    received − units sold    │
//! │  │  moved_on       │   │  expires_on     │    referencing the lot      │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is created or mutated by the engine. Every value lives for
//! the duration of one request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Product identifier.
pub type ProductId = i64;

/// Purchase identifier.
pub type PurchaseId = i64;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier. Also shown to users as the SKU.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Current unit price in cents. Never negative.
    pub price_cents: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// The SKU shown on dashboards is the identifier rendered as text.
    pub fn sku(&self) -> String {
        self.id.to_string()
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// A customer purchase (basket header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub purchased_on: NaiveDate,
    /// Customer document reference.
    pub customer_ref: String,
}

/// One unit of a product inside a purchase.
///
/// Sales are counted per line item: two units of the same product in one
/// basket are two line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLineItem {
    pub id: i64,
    pub purchase_id: PurchaseId,
    pub product_id: ProductId,
    pub unit_value_cents: i64,
    /// Promotional flyer the item was sold under, if any.
    pub flyer: Option<String>,
    /// Stock lot the unit was taken from, if tracked.
    pub lot_ref: Option<String>,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received.
    Inbound,
    /// Manual correction removing stock (breakage, shrinkage).
    OutboundAdjustment,
}

impl MovementKind {
    /// Storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Inbound => "inbound",
            MovementKind::OutboundAdjustment => "outbound_adjustment",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inbound" | "entry" => Ok(MovementKind::Inbound),
            "outbound_adjustment" | "adjustment" => Ok(MovementKind::OutboundAdjustment),
            other => Err(ValidationError::InvalidFormat {
                field: "movement_kind".to_string(),
                reason: format!("unknown kind '{}'", other),
            }),
        }
    }
}

/// An append-only stock movement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: i64,
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub moved_on: NaiveDate,
    pub lot_ref: Option<String>,
    pub expires_on: Option<NaiveDate>,
}

// =============================================================================
// Lot
// =============================================================================

/// A batch of stock received together.
///
/// The available quantity is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub product_id: ProductId,
    pub lot_ref: String,
    pub received_quantity: i64,
    /// Number of line items that reference this lot.
    pub sold_quantity: i64,
    pub expires_on: Option<NaiveDate>,
}

impl Lot {
    /// `received − sold`. May be zero or negative on inconsistent data.
    #[inline]
    pub fn current_quantity(&self) -> i64 {
        self.received_quantity - self.sold_quantity
    }

    /// Lots with nothing left are ignored by every stock aggregate.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.current_quantity() > 0
    }
}

// =============================================================================
// Product Lookup
// =============================================================================

/// How a product query string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SearchType {
    /// Case-insensitive substring of the product name.
    #[default]
    Name,
    /// Exact numeric identifier (the SKU).
    Id,
}

impl std::str::FromStr for SearchType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "product" => Ok(SearchType::Name),
            "id" | "sku" => Ok(SearchType::Id),
            other => Err(ValidationError::InvalidFormat {
                field: "search_type".to_string(),
                reason: format!("'{}' is not one of: name, id", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lot_current_quantity() {
        let lot = Lot {
            product_id: 1,
            lot_ref: "L-01".to_string(),
            received_quantity: 10,
            sold_quantity: 10,
            expires_on: None,
        };
        assert_eq!(lot.current_quantity(), 0);
        assert!(!lot.is_available());
    }

    #[test]
    fn test_movement_kind_parsing() {
        assert_eq!("inbound".parse::<MovementKind>().unwrap(), MovementKind::Inbound);
        assert_eq!(
            "outbound_adjustment".parse::<MovementKind>().unwrap(),
            MovementKind::OutboundAdjustment
        );
        assert!("transfer".parse::<MovementKind>().is_err());
    }

    #[test]
    fn test_search_type_aliases() {
        assert_eq!("sku".parse::<SearchType>().unwrap(), SearchType::Id);
        assert_eq!("product".parse::<SearchType>().unwrap(), SearchType::Name);
        assert_eq!(SearchType::default(), SearchType::Name);
    }

    #[test]
    fn test_product_sku_is_identifier() {
        let product = Product {
            id: 7,
            name: "Arroz 5kg".to_string(),
            price_cents: 2490,
        };
        assert_eq!(product.sku(), "7");
        assert_eq!(product.price().cents(), 2490);
    }
}
