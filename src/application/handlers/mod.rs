//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod checkout;
pub mod payment;
pub mod promo;
