//! # Purchase Repository
//!
//! Purchase headers and their line items.
//!
//! ## Row Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  purchases                    purchase_line_items (one row per unit)   │
//! │  ┌────┬──────────────┐        ┌────┬─────────────┬────────────┬─────┐  │
//! │  │ id │ purchased_on │◄───────│ id │ purchase_id │ product_id │ lot │  │
//! │  ├────┼──────────────┤        ├────┼─────────────┼────────────┼─────┤  │
//! │  │ 10 │ 2024-01-01   │        │ 1  │ 10          │ 7          │ L1  │  │
//! │  │    │              │        │ 2  │ 10          │ 7          │ L1  │  │
//! │  │    │              │        │ 3  │ 10          │ 9          │     │  │
//! │  └────┴──────────────┘        └────┴─────────────┴────────────┴─────┘  │
//! │                                                                         │
//! │  Units sold of product 7 on 2024-01-01 = 2                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::{push_date_filter, push_id_list, MAX_IDS_PER_QUERY};
use crate::error::DbResult;
use synergy_core::{DatePredicate, ProductId, PurchaseId, PurchaseLineItem};

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: i64,
    purchase_id: i64,
    product_id: i64,
    unit_value_cents: i64,
    flyer: Option<String>,
    lot_ref: Option<String>,
}

impl From<LineItemRow> for PurchaseLineItem {
    fn from(row: LineItemRow) -> Self {
        PurchaseLineItem {
            id: row.id,
            purchase_id: row.purchase_id,
            product_id: row.product_id,
            unit_value_cents: row.unit_value_cents,
            flyer: row.flyer,
            lot_ref: row.lot_ref,
        }
    }
}

/// A unit to record in a new purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub unit_value_cents: i64,
    pub flyer: Option<String>,
    pub lot_ref: Option<String>,
}

impl NewLineItem {
    pub fn new(product_id: ProductId, unit_value_cents: i64) -> Self {
        NewLineItem {
            product_id,
            unit_value_cents,
            flyer: None,
            lot_ref: None,
        }
    }

    /// Marks the unit as taken from a stock lot.
    pub fn from_lot(mut self, lot_ref: impl Into<String>) -> Self {
        self.lot_ref = Some(lot_ref.into());
        self
    }
}

/// Repository for purchases and line items.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Identifiers of purchases whose date matches the predicate.
    pub async fn ids_matching(&self, predicate: &DatePredicate) -> DbResult<Vec<PurchaseId>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT id FROM purchases WHERE ");
        push_date_filter(&mut builder, "purchased_on", predicate);
        builder.push(" ORDER BY id");

        let ids = builder
            .build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await?;

        debug!(?predicate, count = ids.len(), "Purchases matching predicate");
        Ok(ids)
    }

    /// Line items of the given purchases, optionally for one product.
    ///
    /// Long identifier lists are queried in chunks; rows come back ordered
    /// by line item id within each chunk.
    pub async fn line_items(
        &self,
        purchase_ids: &[PurchaseId],
        product_id: Option<ProductId>,
    ) -> DbResult<Vec<PurchaseLineItem>> {
        let mut items = Vec::new();

        for chunk in purchase_ids.chunks(MAX_IDS_PER_QUERY) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "SELECT id, purchase_id, product_id, unit_value_cents, flyer, lot_ref \
                 FROM purchase_line_items WHERE ",
            );
            push_id_list(&mut builder, "purchase_id", chunk);
            if let Some(product_id) = product_id {
                builder.push(" AND product_id = ").push_bind(product_id);
            }
            builder.push(" ORDER BY id");

            let rows = builder
                .build_query_as::<LineItemRow>()
                .fetch_all(&self.pool)
                .await?;
            items.extend(rows.into_iter().map(PurchaseLineItem::from));
        }

        debug!(
            purchases = purchase_ids.len(),
            ?product_id,
            count = items.len(),
            "Fetched line items"
        );
        Ok(items)
    }

    /// One purchase date per unit of `product_id` sold on matching days.
    pub async fn sale_dates(
        &self,
        product_id: ProductId,
        predicate: &DatePredicate,
    ) -> DbResult<Vec<NaiveDate>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT p.purchased_on FROM purchase_line_items li \
             INNER JOIN purchases p ON p.id = li.purchase_id \
             WHERE li.product_id = ",
        );
        builder.push_bind(product_id).push(" AND ");
        push_date_filter(&mut builder, "p.purchased_on", predicate);
        builder.push(" ORDER BY p.purchased_on");

        let dates = builder
            .build_query_scalar::<NaiveDate>()
            .fetch_all(&self.pool)
            .await?;
        Ok(dates)
    }

    /// Records a purchase and its units in one transaction.
    pub async fn insert(
        &self,
        purchased_on: NaiveDate,
        customer_ref: &str,
        items: &[NewLineItem],
    ) -> DbResult<PurchaseId> {
        let mut tx = self.pool.begin().await?;

        let purchase_id: i64 = sqlx::query_scalar(
            "INSERT INTO purchases (purchased_on, customer_ref) VALUES (?1, ?2) RETURNING id",
        )
        .bind(purchased_on)
        .bind(customer_ref)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO purchase_line_items \
                 (purchase_id, product_id, unit_value_cents, flyer, lot_ref) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(purchase_id)
            .bind(item.product_id)
            .bind(item.unit_value_cents)
            .bind(item.flyer.as_deref())
            .bind(item.lot_ref.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(purchase_id, %purchased_on, units = items.len(), "Inserted purchase");
        Ok(purchase_id)
    }

    /// Number of purchases recorded.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use synergy_core::DateRange;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchases();
        repo.insert(
            day(2024, 1, 1),
            "111",
            &[NewLineItem::new(1, 500), NewLineItem::new(1, 500), NewLineItem::new(2, 300)],
        )
        .await
        .unwrap();
        repo.insert(day(2024, 1, 15), "222", &[NewLineItem::new(2, 300)])
            .await
            .unwrap();
        repo.insert(day(2024, 3, 1), "333", &[NewLineItem::new(1, 500)])
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_ids_matching_predicates() {
        let db = seeded().await;
        let repo = db.purchases();

        assert_eq!(
            repo.ids_matching(&DatePredicate::On(day(2024, 1, 1))).await.unwrap(),
            vec![1]
        );

        let jan = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        assert_eq!(
            repo.ids_matching(&DatePredicate::Between(jan)).await.unwrap(),
            vec![1, 2]
        );

        let mar = DateRange::single(day(2024, 3, 1));
        assert_eq!(
            repo.ids_matching(&DatePredicate::AnyOf(vec![jan, mar]))
                .await
                .unwrap(),
            vec![1, 2, 3]
        );

        assert_eq!(
            repo.ids_matching(&DatePredicate::Before(day(2024, 1, 15)))
                .await
                .unwrap(),
            vec![1]
        );
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_line_items_filter_by_product() {
        let db = seeded().await;
        let repo = db.purchases();

        let all = repo.line_items(&[1, 2], None).await.unwrap();
        assert_eq!(all.len(), 4);

        let only_first = repo.line_items(&[1, 2], Some(1)).await.unwrap();
        assert_eq!(only_first.len(), 2);
        assert!(only_first.iter().all(|i| i.product_id == 1));
    }

    #[tokio::test]
    async fn test_sale_dates_one_per_unit() {
        let db = seeded().await;
        let everything = DatePredicate::Before(day(2100, 1, 1));
        let dates = db.purchases().sale_dates(1, &everything).await.unwrap();
        assert_eq!(dates, vec![day(2024, 1, 1), day(2024, 1, 1), day(2024, 3, 1)]);
    }
}
