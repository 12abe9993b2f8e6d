//! # Data Access
//!
//! The read-only queries the engine runs against whatever holds the rows.
//!
//! ```text
//! ┌──────────────────┐   AnalyticsStore   ┌──────────────────────────────┐
//! │ AnalyticsEngine  │ ─────────────────► │ synergy_db::Database (sqlx)  │
//! │  (owns no conn)  │                    │ InMemoryStore (tests, demo)  │
//! └──────────────────┘                    └──────────────────────────────┘
//! ```
//!
//! Implementations own their connections. Failures are returned as the
//! implementation's own error type and reach the caller unchanged inside
//! [`CoreError::Store`](crate::error::CoreError::Store).

use std::future::Future;

use chrono::NaiveDate;

use crate::period::DatePredicate;
use crate::types::{Lot, Product, ProductId, PurchaseId, PurchaseLineItem, StockMovement};

/// Read queries used by the analytics engine.
pub trait AnalyticsStore: Send + Sync {
    /// Failure type of the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Exact identifier lookup.
    fn product_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send;

    /// Case-insensitive name substring; lowest identifier wins.
    fn product_by_name(
        &self,
        fragment: &str,
    ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send;

    /// Batch lookup; unknown identifiers are simply absent.
    fn products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;

    /// Purchases whose date matches the predicate.
    fn purchase_ids(
        &self,
        predicate: &DatePredicate,
    ) -> impl Future<Output = Result<Vec<PurchaseId>, Self::Error>> + Send;

    /// Line items of the given purchases, optionally for one product only.
    fn line_items(
        &self,
        purchase_ids: &[PurchaseId],
        product_id: Option<ProductId>,
    ) -> impl Future<Output = Result<Vec<PurchaseLineItem>, Self::Error>> + Send;

    /// Inbound movements of a product on matching days.
    fn inbound_movements(
        &self,
        product_id: ProductId,
        predicate: &DatePredicate,
    ) -> impl Future<Output = Result<Vec<StockMovement>, Self::Error>> + Send;

    /// One purchase date per unit of the product sold on matching days.
    fn sale_dates(
        &self,
        product_id: ProductId,
        predicate: &DatePredicate,
    ) -> impl Future<Output = Result<Vec<NaiveDate>, Self::Error>> + Send;

    /// Every lot of the product with its derived sold quantity.
    fn lots(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Vec<Lot>, Self::Error>> + Send;
}
