//! ValidatePromoHandler - Query handler resolving a promo code to a discount.
//!
//! Validation is read-only. Recording a redemption is the job of whoever
//! finalizes the order (see `CompleteCheckoutHandler`).

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{EventId, Money, Timestamp, ValidationError};
use crate::domain::promo::{select_for_event, PromoCode, PromoError, Promotion};
use crate::ports::PromoRepository;

/// Query to validate a promo code against an order.
#[derive(Debug, Clone)]
pub struct ValidatePromoCommand {
    pub code: String,
    /// The event being booked; `None` matches global codes only.
    pub event_id: Option<EventId>,
    pub subtotal: Money,
}

/// A promo code accepted for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedPromo {
    pub promo: Promotion,
    pub discount_amount: Money,
    pub final_amount: Money,
}

/// Handler for validating promo codes.
pub struct ValidatePromoHandler {
    repository: Arc<dyn PromoRepository>,
}

impl ValidatePromoHandler {
    pub fn new(repository: Arc<dyn PromoRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: ValidatePromoCommand) -> Result<ValidatedPromo, PromoError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    /// Validates against an explicit clock.
    pub async fn handle_at(
        &self,
        cmd: ValidatePromoCommand,
        now: Timestamp,
    ) -> Result<ValidatedPromo, PromoError> {
        self.resolve(cmd, now, false).await
    }

    /// Validates again after a redemption lost the race for a row's last use.
    ///
    /// Exhausted rows are skipped, so a global row with the same code can stand
    /// in for an event-scoped one that just ran out.
    pub async fn revalidate(&self, cmd: ValidatePromoCommand) -> Result<ValidatedPromo, PromoError> {
        self.resolve(cmd, Timestamp::now(), true).await
    }

    async fn resolve(
        &self,
        cmd: ValidatePromoCommand,
        now: Timestamp,
        skip_exhausted: bool,
    ) -> Result<ValidatedPromo, PromoError> {
        // 1. Normalize
        let code = normalize(&cmd.code)?;

        // 2. Live candidates for this code and scope
        let mut candidates = self
            .repository
            .find_live_by_code(&code, cmd.event_id.as_ref(), &now)
            .await?;

        tracing::debug!(code = %code, candidates = candidates.len(), "Validating promo code");

        if skip_exhausted && !candidates.is_empty() {
            candidates.retain(Promotion::can_redeem);
            if candidates.is_empty() {
                return Err(PromoError::usage_limit_exceeded(code.as_str()));
            }
        }

        // 3-4. Prefer the event-scoped row
        let promo = select_for_event(candidates, cmd.event_id.as_ref())
            .ok_or_else(|| PromoError::not_found(code.as_str()))?;

        // 5-7. Usage cap, minimum order, discount
        let discount_amount = promo.evaluate(cmd.subtotal)?;
        let final_amount = cmd.subtotal.saturating_sub(discount_amount);

        Ok(ValidatedPromo {
            promo,
            discount_amount,
            final_amount,
        })
    }
}

/// Blank input is a bad request. Any other code that cannot name a stored
/// promotion simply matches nothing.
fn normalize(raw: &str) -> Result<PromoCode, PromoError> {
    PromoCode::try_new(raw).map_err(|e| match e {
        ValidationError::EmptyField { .. } => PromoError::InvalidCode(e.to_string()),
        _ => PromoError::not_found(raw.trim().to_uppercase()),
    })
}
