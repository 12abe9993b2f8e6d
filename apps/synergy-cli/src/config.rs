//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --db ./synergy.db                                                  │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     SYNERGY_DB_PATH, SYNERGY_DB_MAX_CONNECTIONS,                       │
//! │     SYNERGY_RELATED_LIMIT, SYNERGY_LOG, SYNERGY_LOG_JSON               │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <PATH>, or synergy.toml in the platform config dir        │
//! │     ~/.config/synergy/synergy.toml (Linux)                             │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "synergy.db"
//! max_connections = 5
//! connect_timeout_secs = 30
//!
//! [analytics]
//! related_limit = 5
//! velocity_window_days = 365
//! critical_days_of_supply = 15
//! overstock_days_of_supply = 30
//! expiry_warning_days = 90
//!
//! [logging]
//! filter = "info,synergy=debug,sqlx=warn"
//! json = false
//! ```
//!
//! Every section and field is optional.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use synergy_core::AnalyticsSettings;
use synergy_db::DbConfig;

use crate::error::{CliError, CliResult};

// =============================================================================
// Sections
// =============================================================================

/// `[database]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file. Created on first use.
    pub path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 30
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: 5,
            connect_timeout_secs: 30,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,

    /// One JSON object per event instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: "info,synergy=debug,sqlx=warn".to_string(),
            json: false,
        }
    }
}

// =============================================================================
// Root
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynergyConfig {
    pub database: DatabaseSettings,
    pub analytics: AnalyticsSettings,
    pub logging: LoggingSettings,
}

impl SynergyConfig {
    /// `synergy.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "synergy", "synergy")
            .map(|dirs| dirs.config_dir().join("synergy.toml"))
    }

    /// Loads defaults, then the config file, then environment overrides,
    /// then validates.
    ///
    /// An explicit `config_path` must exist; the default location may be
    /// absent.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &std::path::Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parses a TOML document; missing fields take their defaults.
    pub fn from_toml_str(contents: &str) -> CliResult<Self> {
        toml::from_str(contents).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Applies `SYNERGY_*` overrides read through `lookup`.
    ///
    /// Unparsable numeric or boolean values are rejected.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("SYNERGY_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(value) = lookup("SYNERGY_DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_env("SYNERGY_DB_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = lookup("SYNERGY_RELATED_LIMIT") {
            self.analytics.related_limit = parse_env("SYNERGY_RELATED_LIMIT", &value)?;
        }
        if let Some(filter) = lookup("SYNERGY_LOG") {
            self.logging.filter = filter;
        }
        if let Some(value) = lookup("SYNERGY_LOG_JSON") {
            self.logging.json = parse_env("SYNERGY_LOG_JSON", &value)?;
        }
        Ok(())
    }

    /// Rejects configurations the engine or the pool cannot run with.
    pub fn validate(&self) -> CliResult<()> {
        if self.database.max_connections == 0 {
            return Err(CliError::Config(
                "database.max_connections must be greater than 0".into(),
            ));
        }
        self.analytics
            .validate()
            .map_err(|e| CliError::Config(format!("analytics: {}", e)))
    }

    /// Pool settings for [`synergy_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database.path.clone())
            .max_connections(self.database.max_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> CliResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("{} has invalid value '{}'", key, value)))
}

/// `synergy.db` in the platform data directory, or the working directory
/// when no home directory is known.
fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "synergy", "synergy")
        .map(|dirs| dirs.data_dir().join("synergy.db"))
        .unwrap_or_else(|| PathBuf::from("synergy.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SynergyConfig::from_toml_str(
            r#"
            [analytics]
            related_limit = 10

            [logging]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.analytics.related_limit, 10);
        assert_eq!(config.analytics.velocity_window_days, 365);
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "info,synergy=debug,sqlx=warn");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = SynergyConfig::from_toml_str("[database]\npath = \"a.db\"\n").unwrap();
        config
            .apply_overrides(env(&[
                ("SYNERGY_DB_PATH", "b.db"),
                ("SYNERGY_RELATED_LIMIT", "3"),
                ("SYNERGY_LOG_JSON", "true"),
            ]))
            .unwrap();

        assert_eq!(config.database.path, PathBuf::from("b.db"));
        assert_eq!(config.analytics.related_limit, 3);
        assert!(config.logging.json);
    }

    #[test]
    fn test_bad_env_value_rejected() {
        let mut config = SynergyConfig::default();
        let err = config
            .apply_overrides(env(&[("SYNERGY_DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("SYNERGY_DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_validation() {
        assert!(SynergyConfig::default().validate().is_ok());

        let mut config = SynergyConfig::default();
        config.analytics.related_limit = 0;
        assert!(config.validate().is_err());

        let mut config = SynergyConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = SynergyConfig::default();
        config.analytics.critical_days_of_supply = 60.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wrong_type_is_a_config_error() {
        let err = SynergyConfig::from_toml_str("[analytics]\nrelated_limit = \"five\"").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_db_config() {
        let mut config = SynergyConfig::default();
        config.database.path = PathBuf::from("/tmp/x.db");
        config.database.max_connections = 2;
        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(db.max_connections, 2);
        assert!(db.run_migrations);
    }
}
