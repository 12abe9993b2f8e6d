//! # Stock Repository
//!
//! Stock movements and the lots derived from them.
//!
//! A lot is every inbound movement sharing a `lot_ref`. Its sold quantity
//! is the number of line items pointing at it; nothing about lots is stored
//! separately.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::push_date_filter;
use crate::error::{DbError, DbResult};
use synergy_core::{DatePredicate, Lot, MovementKind, ProductId, StockMovement};

#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: i64,
    product_id: i64,
    kind: String,
    quantity: i64,
    moved_on: NaiveDate,
    lot_ref: Option<String>,
    expires_on: Option<NaiveDate>,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = DbError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let kind: MovementKind = row
            .kind
            .parse()
            .map_err(|e| DbError::invalid_data("kind", e))?;

        Ok(StockMovement {
            id: row.id,
            product_id: row.product_id,
            kind,
            quantity: row.quantity,
            moved_on: row.moved_on,
            lot_ref: row.lot_ref,
            expires_on: row.expires_on,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LotRow {
    lot_ref: String,
    received_quantity: i64,
    sold_quantity: i64,
    expires_on: Option<NaiveDate>,
}

/// A stock movement to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub moved_on: NaiveDate,
    pub lot_ref: Option<String>,
    pub expires_on: Option<NaiveDate>,
}

impl NewMovement {
    /// Goods received into a lot.
    pub fn inbound(
        product_id: ProductId,
        quantity: i64,
        moved_on: NaiveDate,
        lot_ref: impl Into<String>,
        expires_on: Option<NaiveDate>,
    ) -> Self {
        NewMovement {
            product_id,
            kind: MovementKind::Inbound,
            quantity,
            moved_on,
            lot_ref: Some(lot_ref.into()),
            expires_on,
        }
    }

    /// Manual outbound correction.
    pub fn adjustment(product_id: ProductId, quantity: i64, moved_on: NaiveDate) -> Self {
        NewMovement {
            product_id,
            kind: MovementKind::OutboundAdjustment,
            quantity,
            moved_on,
            lot_ref: None,
            expires_on: None,
        }
    }
}

/// Repository for stock movements and lots.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Movements of one kind for a product on matching days, oldest first.
    pub async fn movements(
        &self,
        product_id: ProductId,
        kind: MovementKind,
        predicate: &DatePredicate,
    ) -> DbResult<Vec<StockMovement>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, product_id, kind, quantity, moved_on, lot_ref, expires_on \
             FROM stock_movements WHERE product_id = ",
        );
        builder
            .push_bind(product_id)
            .push(" AND kind = ")
            .push_bind(kind.as_str())
            .push(" AND ");
        push_date_filter(&mut builder, "moved_on", predicate);
        builder.push(" ORDER BY moved_on, id");

        let rows = builder
            .build_query_as::<MovementRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(StockMovement::try_from).collect()
    }

    /// Inbound movements for a product on matching days.
    pub async fn inbound(
        &self,
        product_id: ProductId,
        predicate: &DatePredicate,
    ) -> DbResult<Vec<StockMovement>> {
        self.movements(product_id, MovementKind::Inbound, predicate)
            .await
    }

    /// Every lot of the product with its derived sold quantity.
    ///
    /// ## Query
    /// ```text
    /// inbound movements with a lot_ref ──GROUP BY lot_ref──► received, expiry
    /// line items with the same lot_ref ──COUNT────────────► sold
    /// ```
    /// When a lot was received in several movements the earliest expiry wins.
    pub async fn lots(&self, product_id: ProductId) -> DbResult<Vec<Lot>> {
        let rows = sqlx::query_as::<_, LotRow>(
            r#"
            SELECT
                m.lot_ref AS lot_ref,
                SUM(m.quantity) AS received_quantity,
                (
                    SELECT COUNT(*)
                    FROM purchase_line_items li
                    WHERE li.product_id = ?1 AND li.lot_ref = m.lot_ref
                ) AS sold_quantity,
                MIN(m.expires_on) AS expires_on
            FROM stock_movements m
            WHERE m.product_id = ?1
              AND m.kind = 'inbound'
              AND m.lot_ref IS NOT NULL
            GROUP BY m.lot_ref
            ORDER BY m.lot_ref
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(product_id, count = rows.len(), "Fetched lots");

        Ok(rows
            .into_iter()
            .map(|row| Lot {
                product_id,
                lot_ref: row.lot_ref,
                received_quantity: row.received_quantity,
                sold_quantity: row.sold_quantity,
                expires_on: row.expires_on,
            })
            .collect())
    }

    /// Records a movement and returns its id.
    pub async fn insert(&self, movement: &NewMovement) -> DbResult<i64> {
        debug!(
            product_id = movement.product_id,
            kind = %movement.kind,
            quantity = movement.quantity,
            "Inserting stock movement"
        );

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO stock_movements \
             (product_id, kind, quantity, moved_on, lot_ref, expires_on) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
        )
        .bind(movement.product_id)
        .bind(movement.kind.as_str())
        .bind(movement.quantity)
        .bind(movement.moved_on)
        .bind(movement.lot_ref.as_deref())
        .bind(movement.expires_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
