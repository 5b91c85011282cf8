//! Payment gateway simulation configuration
//!
//! Latencies are in milliseconds. Tests and local demos usually set them to
//! zero: `EVENTSPHERE__PAYMENT__CARD_MIN_DELAY_MS=0` and so on.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Simulated gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Card authorization latency lower bound
    #[serde(default = "default_card_min_delay")]
    pub card_min_delay_ms: u64,

    /// Card authorization latency upper bound
    #[serde(default = "default_card_max_delay")]
    pub card_max_delay_ms: u64,

    /// UPI collect latency lower bound
    #[serde(default = "default_upi_min_delay")]
    pub upi_min_delay_ms: u64,

    /// UPI collect latency upper bound
    #[serde(default = "default_upi_max_delay")]
    pub upi_max_delay_ms: u64,

    /// Wallet debit latency
    #[serde(default = "default_wallet_delay")]
    pub wallet_delay_ms: u64,

    /// Refund latency
    #[serde(default = "default_refund_delay")]
    pub refund_delay_ms: u64,

    /// Probability (0.0-1.0) that a well-formed UPI payment fails transiently
    #[serde(default = "default_upi_failure_rate")]
    pub upi_failure_rate: f64,

    /// Wallet balance assumed when a request carries none (whole units)
    #[serde(default = "default_wallet_balance")]
    pub default_wallet_balance: u64,

    /// ISO 4217 code used when a request carries none
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Receipt links are `<receipt_base_url>/<transaction_id>`
    #[serde(default = "default_receipt_base_url")]
    pub receipt_base_url: String,
}

impl PaymentConfig {
    /// Configuration with every delay at zero, for tests and demos.
    pub fn instant() -> Self {
        Self {
            card_min_delay_ms: 0,
            card_max_delay_ms: 0,
            upi_min_delay_ms: 0,
            upi_max_delay_ms: 0,
            wallet_delay_ms: 0,
            refund_delay_ms: 0,
            ..Default::default()
        }
    }

    /// Longest a single simulated gateway call can take.
    pub fn slowest_latency(&self) -> Duration {
        let slowest = self
            .card_max_delay_ms
            .max(self.upi_max_delay_ms)
            .max(self.wallet_delay_ms)
            .max(self.refund_delay_ms);
        Duration::from_millis(slowest)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.card_min_delay_ms > self.card_max_delay_ms {
            return Err(ValidationError::InvalidLatencyRange("card"));
        }
        if self.upi_min_delay_ms > self.upi_max_delay_ms {
            return Err(ValidationError::InvalidLatencyRange("upi"));
        }
        if !(0.0..=1.0).contains(&self.upi_failure_rate) {
            return Err(ValidationError::InvalidFailureRate);
        }
        if self.default_currency.len() != 3
            || !self.default_currency.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(ValidationError::InvalidCurrency);
        }
        if !self.receipt_base_url.starts_with("http://")
            && !self.receipt_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidReceiptUrl);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            card_min_delay_ms: default_card_min_delay(),
            card_max_delay_ms: default_card_max_delay(),
            upi_min_delay_ms: default_upi_min_delay(),
            upi_max_delay_ms: default_upi_max_delay(),
            wallet_delay_ms: default_wallet_delay(),
            refund_delay_ms: default_refund_delay(),
            upi_failure_rate: default_upi_failure_rate(),
            default_wallet_balance: default_wallet_balance(),
            default_currency: default_currency(),
            receipt_base_url: default_receipt_base_url(),
        }
    }
}

fn default_card_min_delay() -> u64 {
    1500
}

fn default_card_max_delay() -> u64 {
    3000
}

fn default_upi_min_delay() -> u64 {
    2000
}

fn default_upi_max_delay() -> u64 {
    4000
}

fn default_wallet_delay() -> u64 {
    1000
}

fn default_refund_delay() -> u64 {
    1500
}

fn default_upi_failure_rate() -> f64 {
    0.10
}

fn default_wallet_balance() -> u64 {
    500
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_receipt_base_url() -> String {
    "https://eventsphere.app/receipts".to_string()
}
