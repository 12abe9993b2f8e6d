//! # Product Repository
//!
//! Catalogue lookups: by identifier, by name fragment, and in batches for
//! naming related products.
//!
//! ## Name Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  query: "açúcar"                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... ORDER BY id      (SQLite LIKE/lower() fold ASCII only)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Rust-side: name.to_lowercase().contains("açúcar")                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  First match = lowest identifier                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::{push_id_list, MAX_IDS_PER_QUERY};
use crate::error::DbResult;
use synergy_core::{Product, ProductId};

/// Row shape of the `products` table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price_cents: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price_cents: row.price_cents,
        }
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its identifier.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price_cents FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// First product (lowest id) whose name contains `fragment`, ignoring case.
    pub async fn find_by_name(&self, fragment: &str) -> DbResult<Option<Product>> {
        let needle = fragment.to_lowercase();
        debug!(fragment = %fragment, "Searching products by name");

        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price_cents FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .find(|row| row.name.to_lowercase().contains(&needle))
            .map(Product::from))
    }

    /// Batch lookup. Unknown identifiers are skipped.
    pub async fn get_many(&self, ids: &[ProductId]) -> DbResult<Vec<Product>> {
        let mut products = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IDS_PER_QUERY) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("SELECT id, name, price_cents FROM products WHERE ");
            push_id_list(&mut builder, "id", chunk);
            builder.push(" ORDER BY id");

            let rows = builder
                .build_query_as::<ProductRow>()
                .fetch_all(&self.pool)
                .await?;
            products.extend(rows.into_iter().map(Product::from));
        }

        debug!(requested = ids.len(), found = products.len(), "Batch product lookup");
        Ok(products)
    }

    /// Inserts a product, keeping its identifier.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, name = %product.name, "Inserting product");

        sqlx::query("INSERT INTO products (id, name, price_cents) VALUES (?1, ?2, ?3)")
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price_cents)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Number of products in the catalogue.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
