//! Axum router configuration for checkout endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    checkout, health_check, pay_with_card, pay_with_upi, pay_with_wallet, refund, validate_promo,
    CheckoutAppState,
};

/// Promo routes, mounted at `/api/promos`.
///
/// - `POST /validate` - Validate a promo code against a subtotal
pub fn promo_routes() -> Router<CheckoutAppState> {
    Router::new().route("/validate", post(validate_promo))
}

/// Payment routes, mounted at `/api/payments`.
///
/// - `POST /card` - Card authorization
/// - `POST /upi` - UPI collect
/// - `POST /wallet` - Wallet debit
/// - `POST /refund` - Refund a transaction
pub fn payment_routes() -> Router<CheckoutAppState> {
    Router::new()
        .route("/card", post(pay_with_card))
        .route("/upi", post(pay_with_upi))
        .route("/wallet", post(pay_with_wallet))
        .route("/refund", post(refund))
}

/// Create the complete checkout module router.
///
/// ```ignore
/// let app = Router::new()
///     .merge(checkout_router())
///     .with_state(CheckoutAppState::new(repo, gateway));
/// ```
pub fn checkout_router() -> Router<CheckoutAppState> {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/promos", promo_routes())
        .nest("/api/payments", payment_routes())
        .route("/api/checkout", post(checkout))
}
