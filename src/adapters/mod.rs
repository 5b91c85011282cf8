//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for promo, payment, and checkout endpoints
//! - `memory` - In-memory promo repository seeded with demo codes
//! - `mock_gateway` - Simulated card, UPI, and wallet processor
//! - `postgres` - PostgreSQL promo repository

pub mod http;
pub mod memory;
pub mod mock_gateway;
pub mod postgres;

pub use memory::InMemoryPromoRepository;
pub use mock_gateway::{MockGatewayConfig, MockPaymentGateway};
pub use postgres::PostgresPromoRepository;
