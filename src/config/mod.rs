//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `EVENTSPHERE` prefix and nested values use double underscores as separators.
//!
//! Every section has defaults, so an empty environment yields a runnable
//! development service on the in-memory promo store.
//!
//! # Example
//!
//! ```no_run
//! use eventsphere::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.listen);
//! ```

mod database;
mod error;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Listener, environment and request budget
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection; `None` selects the in-memory promo store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Simulated payment gateway settings
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EVENTSPHERE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EVENTSPHERE__SERVER__LISTEN=0.0.0.0:8080` -> `server.listen`
    /// - `EVENTSPHERE__DATABASE__URL=...` -> `database.url = ...`
    /// - `EVENTSPHERE__PAYMENT__UPI_FAILURE_RATE=0` -> `payment.upi_failure_rate = 0.0`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EVENTSPHERE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Sections are checked against each other: the request timeout must
    /// outlast the slowest simulated payment, and the database acquire
    /// timeout must fit inside the request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.payment.validate()?;
        self.server.validate(self.payment.slowest_latency())?;
        if let Some(database) = &self.database {
            database.validate(self.server.request_timeout())?;
        }
        Ok(())
    }
}
