//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Initializes the global subscriber. Events go to stderr so stdout carries
/// only the command's JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - overrides the configured filter
/// - `RUST_LOG=synergy_core=trace` - trace for the engine only
/// - Default: `[logging] filter`, itself defaulting to `info,synergy=debug,sqlx=warn`
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
