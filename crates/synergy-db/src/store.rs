//! # AnalyticsStore for SQLite
//!
//! Connects the engine in synergy-core to the repositories.
//!
//! ```text
//! AnalyticsEngine<Database>
//!       │  store.purchase_ids(&predicate)
//!       ▼
//! impl AnalyticsStore for Database      (this file, no logic)
//!       │  self.purchases().ids_matching(&predicate)
//!       ▼
//! PurchaseRepository ──► SqlitePool
//! ```
//!
//! Every method is a straight delegation; errors stay `DbError`.

use chrono::NaiveDate;
use synergy_core::{
    AnalyticsStore, DatePredicate, Lot, Product, ProductId, PurchaseId, PurchaseLineItem,
    StockMovement,
};

use crate::error::DbError;
use crate::pool::Database;

impl AnalyticsStore for Database {
    type Error = DbError;

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, DbError> {
        self.products().get_by_id(id).await
    }

    async fn product_by_name(&self, fragment: &str) -> Result<Option<Product>, DbError> {
        self.products().find_by_name(fragment).await
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, DbError> {
        self.products().get_many(ids).await
    }

    async fn purchase_ids(&self, predicate: &DatePredicate) -> Result<Vec<PurchaseId>, DbError> {
        self.purchases().ids_matching(predicate).await
    }

    async fn line_items(
        &self,
        purchase_ids: &[PurchaseId],
        product_id: Option<ProductId>,
    ) -> Result<Vec<PurchaseLineItem>, DbError> {
        self.purchases().line_items(purchase_ids, product_id).await
    }

    async fn inbound_movements(
        &self,
        product_id: ProductId,
        predicate: &DatePredicate,
    ) -> Result<Vec<StockMovement>, DbError> {
        self.stock().inbound(product_id, predicate).await
    }

    async fn sale_dates(
        &self,
        product_id: ProductId,
        predicate: &DatePredicate,
    ) -> Result<Vec<NaiveDate>, DbError> {
        self.purchases().sale_dates(product_id, predicate).await
    }

    async fn lots(&self, product_id: ProductId) -> Result<Vec<Lot>, DbError> {
        self.stock().lots(product_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
