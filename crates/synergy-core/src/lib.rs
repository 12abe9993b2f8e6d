//! # synergy-core: Pure Sales & Inventory Analytics
//!
//! This crate is the **heart** of Sales Synergy. It turns raw transactional
//! rows into comparative sales metrics, market-basket rankings, daily stock
//! series and stock-aging buckets.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sales Synergy Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Caller (synergy-cli)                         │   │
//! │  │    find ──► related ──► compare ──► history ──► classify       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ synergy-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌───────────┐  ┌──────────┐  │   │
//! │  │   │  engine   │  │  analytics  │  │  period   │  │  store   │  │   │
//! │  │   │ Analytics │  │ cooccurrence│  │ DateRange │  │  trait   │  │   │
//! │  │   │  Engine   │  │ comparison  │  │ Predicate │  │ + memory │  │   │
//! │  │   │           │  │ stock_hist. │  │           │  │          │  │   │
//! │  │   │           │  │ classific.  │  │           │  │          │  │   │
//! │  │   └───────────┘  └─────────────┘  └───────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE AGGREGATION         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ AnalyticsStore                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  synergy-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain rows (Product, Purchase, StockMovement, Lot)
//! - [`money`] - Cent amounts for stock valuation
//! - [`period`] - Inclusive date ranges and date predicates
//! - [`analytics`] - The four aggregation passes
//! - [`engine`] - Orchestrates store reads and passes
//! - [`store`] - The data-access trait
//! - [`memory`] - Vector-backed store for tests and demos
//! - [`settings`] - Tunable thresholds
//! - [`error`] - Domain error types
//! - [`validation`] - Input parsing
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use synergy_core::{AnalyticsEngine, ComparisonParams, InMemoryStore};
//!
//! # tokio_test_block_on(async {
//! let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//!
//! let store = InMemoryStore::new()
//!     .with_product(1, "Café", 1890)
//!     .with_product(2, "Açúcar", 459)
//!     .with_purchase(jan1, &[1, 2])
//!     .with_purchase(jan2, &[1]);
//!
//! let engine = AnalyticsEngine::new(store);
//! let result = engine
//!     .compare_params(1, &ComparisonParams::compare(jan1, jan2))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.side_a_sales, 1);
//! assert_eq!(result.side_b_sales, 1);
//! assert_eq!(result.related_products[0].product_name, "Açúcar");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod engine;
pub mod error;
pub mod memory;
pub mod money;
pub mod period;
pub mod settings;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::classification::{StockClassification, StockTotals};
pub use analytics::comparison::{ComparisonMode, ComparisonParams, ComparisonType, SalesComparison};
pub use analytics::cooccurrence::RelatedProduct;
pub use analytics::stock_history::{StockHistory, StockHistoryPoint};
pub use engine::AnalyticsEngine;
pub use error::{CoreError, CoreResult, ValidationError};
pub use memory::InMemoryStore;
pub use money::Money;
pub use period::{DatePredicate, DateRange};
pub use settings::AnalyticsSettings;
pub use store::AnalyticsStore;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Related products returned by default.
pub const RELATED_PRODUCTS_LIMIT: usize = 5;

/// Trailing window, in days, for sales velocity.
pub const VELOCITY_WINDOW_DAYS: u32 = 365;

/// Days of supply below which a lot is critical.
pub const CRITICAL_DAYS_OF_SUPPLY: f64 = 15.0;

/// Days of supply above which a lot is overstocked.
pub const OVERSTOCK_DAYS_OF_SUPPLY: f64 = 30.0;

/// A lot expiring within this many days is critical.
pub const EXPIRY_WARNING_DAYS: i64 = 90;

/// Longest day count accepted for any configured window (about a century).
pub const MAX_WINDOW_DAYS: i64 = 36_500;
