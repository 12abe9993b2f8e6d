//! # Storage Errors
//!
//! What can go wrong between the analytics engine and SQLite.
//!
//! ```text
//! sqlx::Error / MigrateError
//!       │  From impls below
//!       ▼
//! DbError ──► CoreError::Store (boxed, via AnalyticsStore::Error)
//!                   │
//!                   ▼
//!             CLI: DATABASE_ERROR, exit 4
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A line item points at a missing purchase, or a movement at a missing product.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The file could not be opened or created, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored value does not decode into its domain type, e.g. an
    /// unknown movement kind.
    #[error("Invalid {column} value: {reason}")]
    InvalidData { column: String, reason: String },

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn invalid_data(column: impl Into<String>, reason: impl ToString) -> Self {
        DbError::InvalidData {
            column: column.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                if message.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation { message }
                } else {
                    DbError::QueryFailed(message)
                }
            }
            sqlx::Error::ColumnDecode { index, source } => DbError::invalid_data(index, source),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".into()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            DbError::not_found("Product", 42).to_string(),
            "Product not found: 42"
        );
        assert_eq!(
            DbError::invalid_data("kind", "unknown kind 'transfer'").to_string(),
            "Invalid kind value: unknown kind 'transfer'"
        );
    }

    #[test]
    fn test_pool_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_orphan_line_item_is_foreign_key_violation() {
        use crate::pool::{Database, DbConfig};

        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = sqlx::query("INSERT INTO purchase_line_items (purchase_id, product_id) VALUES (999, 1)")
            .execute(db.pool())
            .await
            .map_err(DbError::from)
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
