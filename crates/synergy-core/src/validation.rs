//! # Validation Module
//!
//! Input parsing for the values callers hand the engine as text.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (CLI / request layer)                                 │
//! │  └── Raw strings: "42", "2024-01-31", "arroz"                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Identifiers must be numeric                                       │
//! │  ├── Dates must be YYYY-MM-DD                                          │
//! │  └── Ranges must not end before they start                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine                                                       │
//! │  └── Only typed values reach the store                                 │
//! │                                                                         │
//! │  Every failure here happens BEFORE a query is issued.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use synergy_core::validation::{parse_date, parse_product_id};
//!
//! assert_eq!(parse_product_id("product_id", " 42 ").unwrap(), 42);
//! assert!(parse_product_id("product_id", "abc").is_err());
//! assert!(parse_date("start_date", "2024-13-01").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::period::DateRange;
use crate::types::ProductId;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Date format accepted from callers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Identifiers
// =============================================================================

/// Parses a product identifier.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be a base-10 integer
/// - Must be positive
pub fn parse_product_id(field: &str, raw: &str) -> ValidationResult<ProductId> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let id: ProductId = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a number", raw),
    })?;

    if id <= 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: ProductId::MAX,
        });
    }

    Ok(id)
}

/// Rejects blank search text and returns it trimmed.
pub fn require_query<'a>(field: &str, raw: &'a str) -> ValidationResult<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(trimmed)
}

// =============================================================================
// Dates
// =============================================================================

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a YYYY-MM-DD date ({})", raw, e),
    })
}

/// Builds a range from two parsed dates, naming the field on failure.
pub fn date_range(field: &str, start: NaiveDate, end: NaiveDate) -> ValidationResult<DateRange> {
    DateRange::new(start, end).map_err(|_| ValidationError::InvalidRange {
        field: field.to_string(),
        start: start.to_string(),
        end: end.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
