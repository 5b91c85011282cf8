//! Promo code value object.
//!
//! Codes are case-insensitive. The canonical form is trimmed and uppercase,
//! so `" welcome10 "` and `"WELCOME10"` name the same promotion.
//!
//! # Validation Rules
//!
//! - Not empty after trimming
//! - 3-32 characters
//! - ASCII letters, digits, `-` and `_` only

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 32;

/// A normalized promotional code.
///
/// # Example
///
/// ```
/// use eventsphere::domain::promo::PromoCode;
///
/// let code = PromoCode::try_new("  welcome10 ").unwrap();
/// assert_eq!(code.as_str(), "WELCOME10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromoCode(String);

impl PromoCode {
    /// Creates a new PromoCode from user input, normalizing and validating it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - Code is empty after trimming
    /// - Code is shorter than 3 or longer than 32 characters
    /// - Code contains characters other than letters, digits, `-`, `_`
    pub fn try_new(code: &str) -> Result<Self, ValidationError> {
        let normalized = code.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(ValidationError::empty_field("promo_code"));
        }

        if normalized.len() < MIN_LEN || normalized.len() > MAX_LEN {
            return Err(ValidationError::out_of_range(
                "promo_code_length",
                MIN_LEN as i64,
                MAX_LEN as i64,
                normalized.len() as i64,
            ));
        }

        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "promo_code",
                "letters, digits, '-' and '_' only",
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the canonical code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PromoCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PromoCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl TryFrom<String> for PromoCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}

impl From<PromoCode> for String {
    fn from(code: PromoCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        let code = PromoCode::try_new("  save20\t").unwrap();
        assert_eq!(code.as_str(), "SAVE20");
    }

    #[test]
    fn mixed_case_inputs_are_equal() {
        assert_eq!(
            PromoCode::try_new("EarlyBird").unwrap(),
            PromoCode::try_new("EARLYBIRD").unwrap()
        );
    }

    #[test]
    fn hyphen_and_underscore_allowed() {
        assert!(PromoCode::try_new("fest-2026_vip").is_ok());
    }

    #[test]
    fn empty_code_returns_error() {
        match PromoCode::try_new("   ").unwrap_err() {
            ValidationError::EmptyField { field } => assert_eq!(field, "promo_code"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn too_short_returns_error() {
        assert!(matches!(
            PromoCode::try_new("ab"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn too_long_returns_error() {
        let long = "A".repeat(33);
        assert!(matches!(
            PromoCode::try_new(&long),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn special_characters_rejected() {
        assert!(matches!(
            PromoCode::try_new("SAVE 20"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(PromoCode::try_new("SAVE20!").is_err());
    }

    #[test]
    fn deserialization_normalizes() {
        let code: PromoCode = serde_json::from_str("\"flat50\"").unwrap();
        assert_eq!(code.as_str(), "FLAT50");
    }
}
