//! # Schema Migrations
//!
//! The schema ships inside the binary; `Database::new` applies whatever
//! the file has not seen yet.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   products, purchases, purchase_line_items,
//!                              stock_movements
//!
//! Database::new ──► MIGRATOR.run ──► _sqlx_migrations (one row per file)
//! ```
//!
//! Applied files are checksummed, so schema changes go into a new
//! `NNN_description.sql` rather than an edit to an existing one.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations in filename order, one transaction each.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}
