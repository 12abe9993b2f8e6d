//! # Error Types
//!
//! Domain-specific error types for synergy-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  synergy-core errors (this file)                                       │
//! │  ├── CoreError        - Not-found, invalid input, store failure        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  synergy-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: DbError ──► CoreError::Store (unchanged) ──► caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT An Error
//! - A related product whose name cannot be resolved (placeholder label)
//! - A day without stock movement (zero entries/outputs)
//! - A percentage or velocity with a zero denominator (explicit substitution)

use std::error::Error as StdError;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the analytics engine.
///
/// Not-found and invalid-input are the only conditions the engine raises
/// itself. Anything else comes from the data store and is carried unchanged.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Target product of a comparison doesn't exist
    /// - Stock history or classification requested for an unknown product
    /// - Name search matched nothing
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The data store failed. The source error is kept as-is.
    #[error(transparent)]
    Store(Box<dyn StdError + Send + Sync + 'static>),
}

impl CoreError {
    /// Wraps a data-store failure.
    pub fn store<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        CoreError::Store(Box::new(err))
    }

    /// True for the not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::ProductNotFound(_))
    }

    /// True for the invalid-input condition.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any query is issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., non-numeric product identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Date range whose end precedes its start.
    #[error("{field} ends ({end}) before it starts ({start})")]
    InvalidRange {
        field: String,
        start: String,
        end: String,
    },

    /// A comparison mode was selected without a parameter it needs.
    #[error("{mode} requires {parameter}")]
    MissingParameter { mode: String, parameter: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("42".to_string());
        assert_eq!(err.to_string(), "Product not found: 42");
        assert!(err.is_not_found());
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::InvalidFormat {
            field: "product_id".to_string(),
            reason: "'abc' is not a number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "product_id has invalid format: 'abc' is not a number"
        );

        let err = ValidationError::MissingParameter {
            mode: "period comparison".to_string(),
            parameter: "second_start_date".to_string(),
        };
        assert_eq!(err.to_string(), "period comparison requires second_start_date");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "query".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(core_err.is_invalid_input());
    }

    #[test]
    fn test_store_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "database is locked");
        let err = CoreError::store(io);
        assert_eq!(err.to_string(), "database is locked");
        assert!(!err.is_not_found());
    }
}
