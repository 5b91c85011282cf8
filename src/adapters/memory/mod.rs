//! In-memory adapters.

mod promo_repository;

pub use promo_repository::InMemoryPromoRepository;
