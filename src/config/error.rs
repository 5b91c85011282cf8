//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Listen port must be non-zero")]
    InvalidPort,

    #[error("Request timeout {timeout_ms}ms must exceed the slowest payment latency {slowest_ms}ms")]
    TimeoutBelowPaymentLatency { timeout_ms: u64, slowest_ms: u64 },

    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool size {actual} must be between 1 and {max}")]
    InvalidPoolSize { actual: u32, max: u32 },

    #[error("Acquire timeout {acquire_ms}ms must be non-zero and below the request timeout {request_ms}ms")]
    AcquireTimeoutOutOfRange { acquire_ms: u64, request_ms: u64 },

    #[error("Invalid latency range for {0}: min exceeds max")]
    InvalidLatencyRange(&'static str),

    #[error("UPI failure rate must be between 0.0 and 1.0")]
    InvalidFailureRate,

    #[error("Currency must be a three-letter ISO code")]
    InvalidCurrency,

    #[error("Receipt base URL must be http(s)")]
    InvalidReceiptUrl,
}
