//! Payment failure taxonomy.
//!
//! Every failed authorization carries a machine-readable code, a
//! human-readable message from a fixed table, and a decline code in the
//! shape card networks use.

use serde::{Deserialize, Serialize};

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Card was declined by the issuer.
    Declined,

    /// Card has insufficient funds.
    InsufficientFunds,

    /// Card is expired.
    Expired,

    /// Card details are malformed (number, CVV).
    Invalid,

    /// UPI identifier is not of the form `name@bank`.
    InvalidUpiFormat,

    /// Simulated transient UPI gateway failure.
    UpiTransientFailure,

    /// Wallet balance does not cover the amount.
    InsufficientWalletBalance,
}

impl PaymentErrorCode {
    /// Wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentErrorCode::Declined => "declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::Expired => "expired",
            PaymentErrorCode::Invalid => "invalid",
            PaymentErrorCode::InvalidUpiFormat => "invalid_upi_format",
            PaymentErrorCode::UpiTransientFailure => "upi_transient_failure",
            PaymentErrorCode::InsufficientWalletBalance => "insufficient_wallet_balance",
        }
    }

    /// User-facing message for this failure.
    pub fn default_message(&self) -> &'static str {
        match self {
            PaymentErrorCode::Declined => "Your card was declined.",
            PaymentErrorCode::InsufficientFunds => "Your card has insufficient funds.",
            PaymentErrorCode::Expired => "Your card has expired.",
            PaymentErrorCode::Invalid => "Your card details are invalid. Please check and try again.",
            PaymentErrorCode::InvalidUpiFormat => "Invalid UPI ID. Expected the format name@bank.",
            PaymentErrorCode::UpiTransientFailure => {
                "UPI payment failed due to a temporary issue. Please try again."
            }
            PaymentErrorCode::InsufficientWalletBalance => "Insufficient wallet balance.",
        }
    }

    /// Network-style decline code.
    pub fn decline_code(&self) -> &'static str {
        match self {
            PaymentErrorCode::Declined => "generic_decline",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::Expired => "expired_card",
            PaymentErrorCode::Invalid => "invalid_card_details",
            PaymentErrorCode::InvalidUpiFormat => "invalid_vpa",
            PaymentErrorCode::UpiTransientFailure => "processing_error",
            PaymentErrorCode::InsufficientWalletBalance => "insufficient_balance",
        }
    }

    /// Whether resubmitting the same request can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::UpiTransientFailure)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failed payment authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Network-style decline code.
    pub decline_code: String,

    /// Whether the operation can be retried.
    #[serde(skip)]
    pub retryable: bool,
}

impl PaymentError {
    /// Create an error with the standard message for `code`.
    pub fn new(code: PaymentErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            decline_code: code.decline_code().to_string(),
            retryable: code.is_retryable(),
        }
    }

    /// Replace the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn declined() -> Self {
        Self::new(PaymentErrorCode::Declined)
    }

    pub fn insufficient_funds() -> Self {
        Self::new(PaymentErrorCode::InsufficientFunds)
    }

    pub fn expired() -> Self {
        Self::new(PaymentErrorCode::Expired)
    }

    pub fn invalid() -> Self {
        Self::new(PaymentErrorCode::Invalid)
    }

    pub fn invalid_upi_format() -> Self {
        Self::new(PaymentErrorCode::InvalidUpiFormat)
    }

    pub fn upi_transient_failure() -> Self {
        Self::new(PaymentErrorCode::UpiTransientFailure)
    }

    pub fn insufficient_wallet_balance() -> Self {
        Self::new(PaymentErrorCode::InsufficientWalletBalance)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}
