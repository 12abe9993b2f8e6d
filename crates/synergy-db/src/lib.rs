//! # synergy-db: Database Layer for Sales Synergy
//!
//! SQLite storage for purchases, products and stock movements, plus the
//! [`synergy_core::AnalyticsStore`] implementation the engine reads through.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sales Synergy Data Flow                          │
//! │                                                                         │
//! │  synergy-cli (compare / history / classify ...)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AnalyticsEngine<Database>          (synergy-core)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     synergy-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo    │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ PurchaseRepo   │    │   _schema    │  │   │
//! │  │   │ store.rs impl │    │ StockRepo      │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (path from synergy.toml or SYNERGY_DB_PATH)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, purchase, stock)
//! - [`store`] - `AnalyticsStore` for [`Database`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use synergy_core::AnalyticsEngine;
//! use synergy_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/synergy.db")).await?;
//! let engine = AnalyticsEngine::new(db);
//! let totals = engine.stock_totals(42).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::purchase::{NewLineItem, PurchaseRepository};
pub use repository::stock::{NewMovement, StockRepository};
