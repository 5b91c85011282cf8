//! Request and response DTOs for checkout endpoints.
//!
//! Promo endpoints use snake_case to match stored promo rows. Payment and
//! checkout endpoints use camelCase to match the payment result shape.

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::application::{PaymentInstrument, ValidatedPromo};
use crate::domain::foundation::{EventId, Money};
use crate::domain::payment::{PaymentError, WalletType};
use crate::domain::promo::DiscountType;

// ════════════════════════════════════════════════════════════════════════════════
// Promo
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/promos/validate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatePromoRequest {
    pub code: String,
    #[serde(default)]
    pub event_id: Option<EventId>,
    pub subtotal: Money,
}

/// An accepted promo code and its effect on the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatePromoResponse {
    pub valid: bool,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub discount_amount: Money,
    pub final_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
}

impl From<ValidatedPromo> for ValidatePromoResponse {
    fn from(validated: ValidatedPromo) -> Self {
        let promo = validated.promo;
        Self {
            valid: true,
            code: promo.code.to_string(),
            description: promo.description,
            discount_type: promo.discount.discount_type,
            discount_value: promo.discount.value,
            discount_amount: validated.discount_amount,
            final_amount: validated.final_amount,
            event_id: promo.event_id,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/payments/card`.
///
/// No `Debug`: the number and CVV are secrets, and the remaining fields are
/// not worth a manual impl.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPaymentBody {
    pub number: SecretString,
    pub expiry: String,
    pub cvv: SecretString,
    pub holder_name: String,
    pub amount: Money,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub save_card: bool,
}

/// Body of `POST /api/payments/upi`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiPaymentBody {
    pub upi_id: String,
    pub amount: Money,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Body of `POST /api/payments/wallet`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletPaymentBody {
    pub wallet_type: WalletType,
    pub amount: Money,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub wallet_balance: Option<Money>,
}

/// Body of `POST /api/payments/refund`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundBody {
    pub transaction_id: String,
    pub amount: Money,
    #[serde(default)]
    pub reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// Payment instrument inside a checkout body, tagged by `method`.
#[derive(Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentInstrumentBody {
    #[serde(rename_all = "camelCase")]
    Card {
        number: SecretString,
        expiry: String,
        cvv: SecretString,
        holder_name: String,
        #[serde(default)]
        save_card: bool,
    },
    #[serde(rename_all = "camelCase")]
    Upi { upi_id: String },
    #[serde(rename_all = "camelCase")]
    Wallet {
        wallet_type: WalletType,
        #[serde(default)]
        wallet_balance: Option<Money>,
    },
}

impl From<PaymentInstrumentBody> for PaymentInstrument {
    fn from(body: PaymentInstrumentBody) -> Self {
        match body {
            PaymentInstrumentBody::Card {
                number,
                expiry,
                cvv,
                holder_name,
                save_card,
            } => PaymentInstrument::Card {
                number,
                expiry,
                cvv,
                holder_name,
                save_card,
            },
            PaymentInstrumentBody::Upi { upi_id } => PaymentInstrument::Upi { upi_id },
            PaymentInstrumentBody::Wallet {
                wallet_type,
                wallet_balance,
            } => PaymentInstrument::Wallet {
                wallet_type,
                wallet_balance,
            },
        }
    }
}

/// Body of `POST /api/checkout`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    #[serde(default)]
    pub event_id: Option<EventId>,
    pub subtotal: Money,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
    pub payment: PaymentInstrumentBody,
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Error body for every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Machine-readable snake_case code.
    pub code: String,
    /// Human-readable message, safe to show to the customer.
    pub message: String,
    /// Network-style decline code on payment failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decline_code: Option<String>,
    /// Whether resubmitting may succeed.
    #[serde(default)]
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            decline_code: None,
            retryable: false,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl From<&PaymentError> for ErrorResponse {
    fn from(err: &PaymentError) -> Self {
        Self {
            code: err.code.as_str().to_string(),
            message: err.message.clone(),
            decline_code: Some(err.decline_code.clone()),
            retryable: err.retryable,
            details: None,
        }
    }
}
