//! Promo query handlers.

mod validate_promo;

pub use validate_promo::{ValidatePromoCommand, ValidatePromoHandler, ValidatedPromo};
