//! # Sales Synergy CLI
//!
//! Runs one analytics operation against the purchase database and prints
//! the result as JSON.
//!
//! ## Module Organization
//! ```text
//! synergy_cli/
//! ├── lib.rs          ◄─── You are here (startup sequence)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── commands.rs     ◄─── Subcommand → engine call → JSON
//! ├── config.rs       ◄─── synergy.toml + SYNERGY_* overrides
//! ├── logging.rs      ◄─── tracing subscriber
//! └── error.rs        ◄─── CliError, ErrorCode, exit status
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

use tracing::info;

use cli::Cli;
use config::SynergyConfig;
use error::{CliError, CliResult};
use synergy_core::AnalyticsEngine;
use synergy_db::Database;

/// Runs the parsed command line and returns the rendered JSON.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                         Command Startup                                 │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → synergy.toml → SYNERGY_* env → --db flag              │
/// │     • validated before anything else runs                              │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • RUST_LOG wins over [logging] filter                              │
/// │     • stderr only, optional JSON                                       │
/// │                                                                         │
/// │  3. Open Database ────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Execute ──────────────────────────────────────────────────────────► │
/// │     • AnalyticsEngine<Database> with [analytics] thresholds            │
/// │     • Pool closed afterwards                                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> CliResult<String> {
    let mut config = SynergyConfig::load(cli.config.clone())?;
    if let Some(path) = &cli.db {
        config.database.path = path.clone();
    }

    logging::init_tracing(&config.logging);
    info!(
        command = cli.command.name(),
        db_path = %config.database.path.display(),
        "Starting synergy"
    );

    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CliError::Config(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
    }

    let db = Database::new(config.db_config()).await?;
    let engine = AnalyticsEngine::with_settings(db.clone(), config.analytics.clone());

    let outcome = commands::execute(&engine, &cli.command).await;
    db.close().await;

    commands::render(&outcome?, cli.pretty)
}
