//! HTTP listener settings
//!
//! A checkout request spans a promo lookup, one simulated authorization and
//! a redemption, so the request timeout is checked against the slowest
//! configured payment latency rather than a fixed ceiling.

use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::error::ValidationError;

/// Listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the checkout API binds to, e.g. `0.0.0.0:8080`
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    #[serde(default)]
    pub environment: Environment,

    /// `tracing` filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// End-to-end budget for one request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Comma-separated browser origins allowed to call the API
    pub cors_origins: Option<String>,
}

/// Deployment environment. Production switches logs to JSON and requires
/// an explicit CORS allow-list.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Configured origins, trimmed, blanks dropped.
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.cors_origins
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Checks the listener against the slowest simulated payment it must wait on.
    pub fn validate(&self, slowest_payment: Duration) -> Result<(), ValidationError> {
        if self.listen.port() == 0 {
            return Err(ValidationError::InvalidPort);
        }

        let timeout = self.request_timeout();
        if timeout <= slowest_payment {
            return Err(ValidationError::TimeoutBelowPaymentLatency {
                timeout_ms: self.request_timeout_ms,
                slowest_ms: slowest_payment.as_millis() as u64,
            });
        }

        let origins = self.allowed_origins();
        if let Some(bad) = origins.iter().find(|o| !is_origin(o)) {
            return Err(ValidationError::InvalidCorsOrigin(bad.to_string()));
        }
        if origins.is_empty() && self.is_production() {
            return Err(ValidationError::MissingRequired("EVENTSPHERE__SERVER__CORS_ORIGINS"));
        }

        Ok(())
    }
}

/// `scheme://host[:port]` with no path.
fn is_origin(origin: &str) -> bool {
    let rest = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.contains('/'))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            environment: Environment::default(),
            log_filter: default_log_filter(),
            request_timeout_ms: default_request_timeout_ms(),
            cors_origins: None,
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_log_filter() -> String {
    "info,eventsphere=debug,sqlx=warn,tower_http=debug".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}
