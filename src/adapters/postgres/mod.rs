//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPromoRepository` - Promo lookup and atomic redemption

mod promo_repository;

pub use promo_repository::PostgresPromoRepository;
