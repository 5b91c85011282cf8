//! HTTP adapter for checkout endpoints.
//!
//! - `POST /api/promos/validate` - Validate a promo code
//! - `POST /api/payments/card` - Pay by card
//! - `POST /api/payments/upi` - Pay by UPI
//! - `POST /api/payments/wallet` - Pay from a wallet
//! - `POST /api/payments/refund` - Refund a payment
//! - `POST /api/checkout` - Promo, payment, and redemption in one call
//! - `GET /health` - Liveness

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{CheckoutApiError, CheckoutAppState};
pub use routes::checkout_router;
