//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `payment` - Card validation, payment methods and the failure taxonomy
//! - `promo` - Promotions, discount computation and scope selection

pub mod foundation;
pub mod payment;
pub mod promo;
