//! Promo store connection settings
//!
//! The whole section is optional. Without it the service runs on the
//! in-memory promo store seeded with demo codes. The store sees short,
//! single-row queries (a lookup and one conditional update per checkout),
//! so a small pool is enough.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 32;

/// PostgreSQL promo store
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; may carry credentials, so it is kept redacted
    pub url: SecretString,

    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// How long a request may wait for a pooled connection
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,

    /// Apply `migrations/` on startup
    #[serde(default)]
    pub run_migrations: bool,

    /// Insert the demo promo codes on startup (existing codes are left alone)
    #[serde(default)]
    pub seed_demo_promos: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: SecretString::new(url.into()),
            pool_size: default_pool_size(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            run_migrations: false,
            seed_demo_promos: false,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    /// Checks the section. `request_timeout` is the server's per-request
    /// budget; waiting longer than that for a connection is pointless.
    pub fn validate(&self, request_timeout: Duration) -> Result<(), ValidationError> {
        let url = self.url.expose_secret();
        if url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EVENTSPHERE__DATABASE__URL"));
        }
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.pool_size == 0 || self.pool_size > MAX_POOL_SIZE {
            return Err(ValidationError::InvalidPoolSize {
                actual: self.pool_size,
                max: MAX_POOL_SIZE,
            });
        }
        if self.acquire_timeout_ms == 0 || self.acquire_timeout() >= request_timeout {
            return Err(ValidationError::AcquireTimeoutOutOfRange {
                acquire_ms: self.acquire_timeout_ms,
                request_ms: request_timeout.as_millis() as u64,
            });
        }
        Ok(())
    }
}

fn default_pool_size() -> u32 {
    5
}

fn default_acquire_timeout_ms() -> u64 {
    2_000
}
