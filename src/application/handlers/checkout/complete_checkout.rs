//! CompleteCheckoutHandler - Applies a promo code, charges, then redeems.
//!
//! Order of operations:
//! 1. Validate the promo code (read-only).
//! 2. Charge the discounted amount.
//! 3. Record the redemption with the repository's atomic increment.
//!
//! A redemption that loses a race for the last use is re-validated and
//! retried once. The retry goes to the same row if it still has uses left,
//! otherwise to another live row for the code (a global row standing in for
//! an exhausted event-scoped one) that gives the same discount. If it still
//! fails, the payment has already gone through, so the error carries the
//! transaction id for the caller to refund.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::application::handlers::payment::{
    PaymentInstrument, ProcessPaymentCommand, ProcessPaymentHandler,
};
use crate::application::handlers::promo::{ValidatePromoCommand, ValidatePromoHandler, ValidatedPromo};
use crate::domain::foundation::{EventId, Money};
use crate::domain::payment::PaymentError;
use crate::domain::promo::{PromoCode, PromoError};
use crate::ports::{PaymentGateway, PaymentResult, PromoRepository, RedemptionOutcome};

/// Redemption attempts after a successful charge.
const MAX_REDEMPTION_ATTEMPTS: usize = 2;

/// Command to pay for an order.
#[derive(Debug)]
pub struct CompleteCheckoutCommand {
    pub event_id: Option<EventId>,
    pub subtotal: Money,
    pub currency: Option<String>,
    pub promo_code: Option<String>,
    pub payment: PaymentInstrument,
}

/// A paid order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub payment: PaymentResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<PromoCode>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub amount_charged: Money,
}

/// Errors from checkout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Promo(#[from] PromoError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Charged, but the promo could not be redeemed.
    #[error("Payment {transaction_id} succeeded but the promo code could not be applied: {reason}")]
    RedemptionFailed {
        transaction_id: String,
        reason: PromoError,
    },
}

/// Handler for completing a checkout.
pub struct CompleteCheckoutHandler {
    repository: Arc<dyn PromoRepository>,
    validator: ValidatePromoHandler,
    payments: ProcessPaymentHandler,
}

impl CompleteCheckoutHandler {
    pub fn new(repository: Arc<dyn PromoRepository>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            validator: ValidatePromoHandler::new(repository.clone()),
            payments: ProcessPaymentHandler::new(gateway),
            repository,
        }
    }

    pub async fn handle(&self, cmd: CompleteCheckoutCommand) -> Result<CheckoutReceipt, CheckoutError> {
        // 1. Validate promo
        let validation = match &cmd.promo_code {
            Some(code) => Some(self.validate(code, &cmd).await?),
            None => None,
        };

        let discount_amount = validation
            .as_ref()
            .map(|v| v.discount_amount)
            .unwrap_or(Money::ZERO);
        let amount_charged = cmd.subtotal.saturating_sub(discount_amount);

        // 2. Charge
        let payment = self
            .payments
            .handle(ProcessPaymentCommand {
                instrument: cmd.payment,
                amount: amount_charged,
                currency: cmd.currency.clone(),
            })
            .await?;

        // 3. Redeem
        let promo_code = match validation {
            Some(validated) => {
                let code = validated.promo.code.clone();
                self.redeem(validated, cmd.promo_code.as_deref(), cmd.event_id, cmd.subtotal, &payment)
                    .await?;
                Some(code)
            }
            None => None,
        };

        tracing::info!(
            transaction_id = %payment.transaction_id,
            amount_charged = %amount_charged,
            discount = %discount_amount,
            "Checkout completed"
        );

        Ok(CheckoutReceipt {
            payment,
            promo_code,
            subtotal: cmd.subtotal,
            discount_amount,
            amount_charged,
        })
    }

    async fn validate(
        &self,
        code: &str,
        cmd: &CompleteCheckoutCommand,
    ) -> Result<ValidatedPromo, PromoError> {
        self.validator
            .handle(ValidatePromoCommand {
                code: code.to_string(),
                event_id: cmd.event_id,
                subtotal: cmd.subtotal,
            })
            .await
    }

    async fn redeem(
        &self,
        mut validated: ValidatedPromo,
        code: Option<&str>,
        event_id: Option<EventId>,
        subtotal: Money,
        payment: &PaymentResult,
    ) -> Result<(), CheckoutError> {
        let failed = |reason: PromoError| {
            tracing::error!(
                transaction_id = %payment.transaction_id,
                code = reason.code(),
                "Promo redemption failed after payment"
            );
            CheckoutError::RedemptionFailed {
                transaction_id: payment.transaction_id.clone(),
                reason,
            }
        };

        for attempt in 1..=MAX_REDEMPTION_ATTEMPTS {
            let outcome = self
                .repository
                .record_redemption(&validated.promo.id)
                .await
                .map_err(|e| failed(PromoError::from(e)))?;

            match outcome {
                RedemptionOutcome::Redeemed { used_count } => {
                    tracing::debug!(code = %validated.promo.code, used_count, "Promo redeemed");
                    return Ok(());
                }
                RedemptionOutcome::NotFound => {
                    return Err(failed(PromoError::not_found(validated.promo.code.as_str())));
                }
                RedemptionOutcome::LimitReached if attempt < MAX_REDEMPTION_ATTEMPTS => {
                    tracing::warn!(code = %validated.promo.code, "Lost redemption race, re-validating");
                    let code = code.unwrap_or(validated.promo.code.as_str()).to_string();
                    let charged_discount = validated.discount_amount;
                    validated = self
                        .validator
                        .revalidate(ValidatePromoCommand {
                            code,
                            event_id,
                            subtotal,
                        })
                        .await
                        .map_err(&failed)?;

                    // The charge is already fixed; a stand-in row must price the same.
                    if validated.discount_amount != charged_discount {
                        break;
                    }
                }
                RedemptionOutcome::LimitReached => break,
            }
        }

        Err(failed(PromoError::usage_limit_exceeded(
            validated.promo.code.as_str(),
        )))
    }
}
