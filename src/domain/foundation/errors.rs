//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Categories of storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The store could not be reached or the query failed.
    DatabaseError,
    /// A stored row does not form a valid promotion.
    CorruptRecord,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::CorruptRecord => "CORRUPT_RECORD",
        };
        write!(f, "{}", s)
    }
}

/// Failure reported by a repository, with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// A stored value that fails domain validation.
    pub fn corrupt_record(field: &str, err: &ValidationError) -> Self {
        Self::new(ErrorCode::CorruptRecord, format!("Invalid {}: {}", field, err))
            .with_detail("field", field)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("promo_code");
        assert_eq!(format!("{}", err), "Field 'promo_code' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("expiry_month", 1, 12, 13);
        assert_eq!(
            format!("{}", err),
            "Field 'expiry_month' must be between 1 and 12, got 13"
        );
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("upi_id", "missing @ symbol");
        assert_eq!(
            format!("{}", err),
            "Field 'upi_id' has invalid format: missing @ symbol"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::database("connection refused");
        assert_eq!(format!("{}", err), "[DATABASE_ERROR] connection refused");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::database("query failed")
            .with_detail("table", "promo_codes")
            .with_detail("operation", "redeem");

        assert_eq!(err.details.get("table"), Some(&"promo_codes".to_string()));
        assert_eq!(err.details.get("operation"), Some(&"redeem".to_string()));
    }

    #[test]
    fn corrupt_record_names_the_field() {
        let err = DomainError::corrupt_record("code", &ValidationError::empty_field("promo_code"));
        assert_eq!(err.code, ErrorCode::CorruptRecord);
        assert_eq!(err.details.get("field"), Some(&"code".to_string()));
        assert!(err.message.contains("cannot be empty"));
    }
}
