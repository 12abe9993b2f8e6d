//! # CLI Error Type
//!
//! Unified error type for every subcommand.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in synergy                                │
//! │                                                                         │
//! │  synergy compare 42 --start 2024-01-01 --end 2023-12-01                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command                                                         │  │
//! │  │  Result<String, CliError>                                        │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store failure? ─── CoreError::Store(DbError) ────┐              │  │
//! │  │         │                                          │              │  │
//! │  │         ▼                                          ▼              │  │
//! │  │  Invalid input? ─── CoreError::Validation ─── ErrorReport ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ── JSON on stdout ─────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: {"code":"VALIDATION_ERROR","message":"..."}   exit status 2   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use synergy_core::CoreError;
use synergy_db::DbError;
use thiserror::Error;

/// Error raised while running a subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    /// Raised by the analytics engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Raised while opening or migrating the database.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Config file unreadable, unparsable or rejected by validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Result could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product not found
    NotFound,

    /// Input or configuration rejected
    ValidationError,

    /// Store failed
    DatabaseError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for this code.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::DatabaseError => 4,
        }
    }
}

/// What gets written to stderr when a command fails.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Product not found: 42" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Core(CoreError::ProductNotFound(_)) => ErrorCode::NotFound,
            CliError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            CliError::Core(CoreError::Store(_)) => ErrorCode::DatabaseError,
            CliError::Database(DbError::NotFound { .. }) => ErrorCode::NotFound,
            CliError::Database(_) => ErrorCode::DatabaseError,
            CliError::Config(_) => ErrorCode::ValidationError,
            CliError::Output(_) => ErrorCode::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.code().exit_code()
    }

    /// Builds the stderr report.
    ///
    /// Store failures are logged in full and reported with a generic message.
    pub fn report(&self) -> ErrorReport {
        let code = self.code();
        let message = match self {
            CliError::Core(CoreError::Store(source)) => {
                tracing::error!("Store operation failed: {}", source);
                "Database operation failed".to_string()
            }
            CliError::Database(DbError::QueryFailed(e)) | CliError::Database(DbError::Internal(e)) => {
                tracing::error!("Database error: {}", e);
                "Database operation failed".to_string()
            }
            other => other.to_string(),
        };
        ErrorReport { code, message }
    }
}

/// Convenience type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;
