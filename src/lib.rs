//! EventSphere checkout core.
//!
//! Promo-code discounts, card validation, and a simulated payment gateway
//! for event ticket orders, exposed as a JSON service over axum.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
