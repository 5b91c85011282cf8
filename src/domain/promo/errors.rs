//! Promo-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidCode | 400 |
//! | NotFound | 404 |
//! | UsageLimitExceeded | 409 |
//! | MinimumNotMet | 400 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, Money};

/// Errors from validating or redeeming a promo code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    /// The submitted code is blank.
    #[error("Invalid promo code: {0}")]
    InvalidCode(String),

    /// No active, unexpired promotion matches the code for this event.
    #[error("Promo code '{code}' is invalid or has expired")]
    NotFound { code: String },

    /// The promotion has been redeemed its maximum number of times.
    #[error("Promo code '{code}' has reached its usage limit")]
    UsageLimitExceeded { code: String },

    /// The order subtotal is below the promotion's minimum.
    #[error("Minimum order amount of {minimum} required for promo code '{code}'")]
    MinimumNotMet {
        code: String,
        minimum: Money,
        subtotal: Money,
    },

    /// Backing store failure.
    #[error("Promo service unavailable: {0}")]
    Infrastructure(String),
}

impl PromoError {
    pub fn not_found(code: impl Into<String>) -> Self {
        PromoError::NotFound { code: code.into() }
    }

    pub fn usage_limit_exceeded(code: impl Into<String>) -> Self {
        PromoError::UsageLimitExceeded { code: code.into() }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PromoError::Infrastructure(message.into())
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            PromoError::InvalidCode(_) => "invalid_promo_code",
            PromoError::NotFound { .. } => "promo_not_found",
            PromoError::UsageLimitExceeded { .. } => "promo_usage_limit_exceeded",
            PromoError::MinimumNotMet { .. } => "promo_minimum_not_met",
            PromoError::Infrastructure(_) => "internal_error",
        }
    }

    /// Usage-limit failures can come from a lost redemption race and are
    /// worth one retry. Everything else yields the same answer on resubmit.
    pub fn is_transient(&self) -> bool {
        matches!(self, PromoError::UsageLimitExceeded { .. })
    }
}

impl From<DomainError> for PromoError {
    fn from(err: DomainError) -> Self {
        PromoError::Infrastructure(err.to_string())
    }
}
