//! # Commands
//!
//! One function per subcommand. Each runs a single engine operation and
//! returns its result as JSON.
//!
//! ```text
//! Command::Compare(args)
//!       │  args.params()
//!       ▼
//! engine.compare_params(product_id, &params)   (synergy-core)
//!       │
//!       ▼
//! serde_json::Value ──► render() ──► stdout
//! ```
//!
//! Dispatch is generic over the store so tests can run it against
//! `InMemoryStore`.

use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use crate::cli::Command;
use crate::error::CliResult;
use synergy_core::{AnalyticsEngine, AnalyticsStore, CoreError, DatePredicate, DateRange};

/// Runs `command` and returns its JSON result.
pub async fn execute<S: AnalyticsStore>(
    engine: &AnalyticsEngine<S>,
    command: &Command,
) -> CliResult<Value> {
    let start = Instant::now();

    let value = match command {
        Command::Find { query, search_type } => {
            to_json(engine.find_product(query, *search_type).await?)?
        }
        Command::Related {
            product_id,
            start,
            end,
        } => {
            let range = DateRange::new(*start, *end).map_err(CoreError::from)?;
            let purchases = engine
                .store()
                .purchase_ids(&DatePredicate::Between(range))
                .await
                .map_err(CoreError::store)?;
            debug!(product_id, purchases = purchases.len(), "Ranking related products");
            to_json(engine.rank_related(*product_id, &purchases).await?)?
        }
        Command::Compare(args) => {
            to_json(engine.compare_params(args.product_id, &args.params()).await?)?
        }
        Command::History {
            query,
            search_type,
            start,
            end,
        } => {
            let product = engine.find_product(query, *search_type).await?;
            to_json(engine.history(product.id, *start, *end).await?)?
        }
        Command::Classify { product_id, as_of } => match as_of {
            Some(today) => to_json(engine.classify_as_of(*product_id, *today).await?)?,
            None => to_json(engine.classify(*product_id).await?)?,
        },
        Command::Totals { product_id } => to_json(engine.stock_totals(*product_id).await?)?,
    };

    info!(
        command = command.name(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Command complete"
    );

    Ok(value)
}

/// Serializes the result for stdout.
pub fn render(value: &Value, pretty: bool) -> CliResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn to_json<T: Serialize>(result: T) -> CliResult<Value> {
    Ok(serde_json::to_value(result)?)
}

impl Command {
    /// Subcommand name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Find { .. } => "find",
            Command::Related { .. } => "related",
            Command::Compare(_) => "compare",
            Command::History { .. } => "history",
            Command::Classify { .. } => "classify",
            Command::Totals { .. } => "totals",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
