//! HTTP handlers for promo, payment, and checkout endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{
    CheckoutError, CompleteCheckoutCommand, CompleteCheckoutHandler, PaymentInstrument,
    ProcessPaymentCommand, ProcessPaymentHandler, RefundPaymentCommand, RefundPaymentHandler,
    ValidatePromoCommand, ValidatePromoHandler,
};
use crate::domain::payment::{PaymentError, PaymentErrorCode};
use crate::domain::promo::PromoError;
use crate::ports::{PaymentGateway, PromoRepository};

use super::dto::{
    CardPaymentBody, CheckoutBody, ErrorResponse, RefundBody, UpiPaymentBody,
    ValidatePromoRequest, ValidatePromoResponse, WalletPaymentBody,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for checkout endpoints.
///
/// Cloned per request; both ports are Arc-wrapped.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub promo_repository: Arc<dyn PromoRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutAppState {
    pub fn new(
        promo_repository: Arc<dyn PromoRepository>,
        payment_gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            promo_repository,
            payment_gateway,
        }
    }

    pub fn validate_promo_handler(&self) -> ValidatePromoHandler {
        ValidatePromoHandler::new(self.promo_repository.clone())
    }

    pub fn process_payment_handler(&self) -> ProcessPaymentHandler {
        ProcessPaymentHandler::new(self.payment_gateway.clone())
    }

    pub fn refund_payment_handler(&self) -> RefundPaymentHandler {
        RefundPaymentHandler::new(self.payment_gateway.clone())
    }

    pub fn checkout_handler(&self) -> CompleteCheckoutHandler {
        CompleteCheckoutHandler::new(self.promo_repository.clone(), self.payment_gateway.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Promo
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/promos/validate - Check a promo code against an order subtotal
pub async fn validate_promo(
    State(state): State<CheckoutAppState>,
    Json(request): Json<ValidatePromoRequest>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let handler = state.validate_promo_handler();
    let query = ValidatePromoCommand {
        code: request.code,
        event_id: request.event_id,
        subtotal: request.subtotal,
    };

    let validated = handler.handle(query).await?;

    Ok(Json(ValidatePromoResponse::from(validated)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/card - Authorize a card payment
pub async fn pay_with_card(
    State(state): State<CheckoutAppState>,
    Json(body): Json<CardPaymentBody>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let cmd = ProcessPaymentCommand {
        instrument: PaymentInstrument::Card {
            number: body.number,
            expiry: body.expiry,
            cvv: body.cvv,
            holder_name: body.holder_name,
            save_card: body.save_card,
        },
        amount: body.amount,
        currency: body.currency,
    };

    let result = state.process_payment_handler().handle(cmd).await?;
    Ok(Json(result))
}

/// POST /api/payments/upi - Collect a UPI payment
pub async fn pay_with_upi(
    State(state): State<CheckoutAppState>,
    Json(body): Json<UpiPaymentBody>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let cmd = ProcessPaymentCommand {
        instrument: PaymentInstrument::Upi {
            upi_id: body.upi_id,
        },
        amount: body.amount,
        currency: body.currency,
    };

    let result = state.process_payment_handler().handle(cmd).await?;
    Ok(Json(result))
}

/// POST /api/payments/wallet - Debit a digital wallet
pub async fn pay_with_wallet(
    State(state): State<CheckoutAppState>,
    Json(body): Json<WalletPaymentBody>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let cmd = ProcessPaymentCommand {
        instrument: PaymentInstrument::Wallet {
            wallet_type: body.wallet_type,
            wallet_balance: body.wallet_balance,
        },
        amount: body.amount,
        currency: body.currency,
    };

    let result = state.process_payment_handler().handle(cmd).await?;
    Ok(Json(result))
}

/// POST /api/payments/refund - Refund a settled transaction
pub async fn refund(
    State(state): State<CheckoutAppState>,
    Json(body): Json<RefundBody>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let cmd = RefundPaymentCommand {
        transaction_id: body.transaction_id,
        amount: body.amount,
        reason: body.reason,
    };

    let result = state.refund_payment_handler().handle(cmd).await?;
    Ok(Json(result))
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/checkout - Apply a promo code, charge, and redeem
pub async fn checkout(
    State(state): State<CheckoutAppState>,
    Json(body): Json<CheckoutBody>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let cmd = CompleteCheckoutCommand {
        event_id: body.event_id,
        subtotal: body.subtotal,
        currency: body.currency,
        promo_code: body.promo_code,
        payment: body.payment.into(),
    };

    let receipt = state.checkout_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness probe
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for converting checkout errors into HTTP responses.
#[derive(Debug)]
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl From<PromoError> for CheckoutApiError {
    fn from(err: PromoError) -> Self {
        Self(CheckoutError::Promo(err))
    }
}

impl From<PaymentError> for CheckoutApiError {
    fn from(err: PaymentError) -> Self {
        Self(CheckoutError::Payment(err))
    }
}

fn promo_status(err: &PromoError) -> StatusCode {
    match err {
        PromoError::InvalidCode(_) | PromoError::MinimumNotMet { .. } => StatusCode::BAD_REQUEST,
        PromoError::NotFound { .. } => StatusCode::NOT_FOUND,
        PromoError::UsageLimitExceeded { .. } => StatusCode::CONFLICT,
        PromoError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn payment_status(err: &PaymentError) -> StatusCode {
    match err.code {
        PaymentErrorCode::Invalid | PaymentErrorCode::InvalidUpiFormat => StatusCode::BAD_REQUEST,
        PaymentErrorCode::Declined
        | PaymentErrorCode::InsufficientFunds
        | PaymentErrorCode::Expired
        | PaymentErrorCode::InsufficientWalletBalance => StatusCode::PAYMENT_REQUIRED,
        PaymentErrorCode::UpiTransientFailure => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn promo_body(err: &PromoError) -> ErrorResponse {
    let body = ErrorResponse::new(err.code(), err.to_string());
    match err {
        PromoError::MinimumNotMet {
            minimum, subtotal, ..
        } => body.with_details(serde_json::json!({
            "min_amount": minimum,
            "subtotal": subtotal,
        })),
        _ => body,
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self.0 {
            CheckoutError::Promo(err) => (promo_status(err), promo_body(err)),
            CheckoutError::Payment(err) => (payment_status(err), ErrorResponse::from(err)),
            CheckoutError::RedemptionFailed {
                transaction_id,
                reason,
            } => (
                StatusCode::CONFLICT,
                ErrorResponse::new("promo_redemption_failed", self.0.to_string()).with_details(
                    serde_json::json!({
                        "transaction_id": transaction_id,
                        "reason": reason.code(),
                    }),
                ),
            ),
        };

        if status.is_server_error() {
            tracing::error!(code = %body.code, message = %body.message, "Checkout request failed");
        }

        (status, Json(body)).into_response()
    }
}
