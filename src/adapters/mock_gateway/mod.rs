//! Simulated payment gateway adapter.
//!
//! Implements `PaymentGateway` without a real card network. Used by the
//! running service for demos and by tests.

mod gateway;
mod ids;

pub use gateway::{LatencyRange, MockGatewayConfig, MockPaymentGateway};
