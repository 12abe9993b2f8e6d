//! # Connection Pool
//!
//! Opens the SQLite file the analytics engine reads from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Who owns the connections                            │
//! │                                                                         │
//! │  synergy-cli                                                           │
//! │       │  SynergyConfig::db_config()                                    │
//! │       ▼                                                                 │
//! │  DbConfig ──► Database::new ──► SqlitePool (+ migrations)              │
//! │                    │                                                    │
//! │                    │  moved into                                        │
//! │                    ▼                                                    │
//! │  AnalyticsEngine<Database>                                             │
//! │       │  store.purchase_ids(..), store.line_items(..) ...              │
//! │       ▼                                                                 │
//! │  any free pooled connection                                            │
//! │                                                                         │
//! │  The engine never opens or closes a connection. The CLI closes the     │
//! │  pool once the command has produced its result.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Connections use WAL journaling so the seed binary (or any other writer)
//! can append purchases while reports are running.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::ProductRepository;
use crate::repository::purchase::PurchaseRepository;
use crate::repository::stock::StockRepository;

// =============================================================================
// DbConfig
// =============================================================================

/// How to open the database.
///
/// ```rust,ignore
/// let config = DbConfig::new("./synergy.db")
///     .max_connections(4)
///     .busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file; `:memory:` for a throwaway database.
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free pooled connection. Default: 30s
    pub connect_timeout: Duration,

    /// Idle connections older than this are dropped. Default: 10 min
    pub idle_timeout: Duration,

    /// How long a statement waits on a locked file before failing. Default: 5s
    pub busy_timeout: Duration,

    /// Apply pending migrations on open. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed database; the file is created when missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Private in-memory database for tests.
    ///
    /// Every SQLite connection to `:memory:` gets its own database, so the
    /// pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            ..DbConfig::new(":memory:")
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let url = format!("sqlite://{}?mode=rwc", self.database_path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
            .create_if_missing(true);

        // WAL needs a real file
        Ok(if self.is_in_memory() {
            options
        } else {
            options.journal_mode(SqliteJournalMode::Wal)
        })
    }
}

// =============================================================================
// Database
// =============================================================================

/// Pooled handle to the analytics database.
///
/// Cheap to clone; clones share the pool. Implements
/// `synergy_core::AnalyticsStore` in `store.rs`.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening analytics database");

        let options = config.connect_options()?;
        debug!(
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            in_memory = config.is_in_memory(),
            "Connection options ready"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool for ad-hoc queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn purchases(&self) -> PurchaseRepository {
        PurchaseRepository::new(self.pool.clone())
    }

    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.pool.clone())
    }

    /// Closes every connection. Later queries fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing analytics database");
        self.pool.close().await;
    }

    /// `SELECT 1` succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_opens_and_migrates() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/synergy-test.db")
            .max_connections(8)
            .min_connections(2)
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);

        assert_eq!(config.max_connections, 8);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_close_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_unopenable_path_is_connection_error() {
        let config = DbConfig::new("/nonexistent-dir/synergy/synergy.db").run_migrations(false);
        let err = Database::new(config).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }
}
