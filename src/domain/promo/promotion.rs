//! Promotion aggregate.
//!
//! A promotion is one stored promo-code row: its discount rule, its limits,
//! and its scope. Code uniqueness is per scope, so the same code may exist
//! once globally and once for a specific event.

use serde::{Deserialize, Serialize};

use super::{Discount, PromoCode, PromoError};
use crate::domain::foundation::{EventId, Money, PromoId, Timestamp};

/// A stored promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromoId,
    pub code: PromoCode,
    #[serde(flatten)]
    pub discount: Discount,
    pub min_amount: Option<Money>,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    /// `None` means the code applies to every event.
    pub event_id: Option<EventId>,
    pub is_active: bool,
    pub expiry_date: Timestamp,
    pub description: Option<String>,
}

impl Promotion {
    /// A new active, global, unlimited promotion with no redemptions.
    pub fn new(code: PromoCode, discount: Discount, expiry_date: Timestamp) -> Self {
        Self {
            id: PromoId::new(),
            code,
            discount,
            min_amount: None,
            max_uses: None,
            used_count: 0,
            event_id: None,
            is_active: true,
            expiry_date,
            description: None,
        }
    }

    pub fn with_min_amount(mut self, min_amount: Money) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    pub fn with_used_count(mut self, used_count: u32) -> Self {
        self.used_count = used_count;
        self
    }

    pub fn for_event(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Active and not yet past its expiry date.
    pub fn is_live_at(&self, now: &Timestamp) -> bool {
        self.is_active && self.expiry_date.is_after(now)
    }

    /// Global, or scoped to `event_id`.
    pub fn applies_to(&self, event_id: Option<&EventId>) -> bool {
        match (&self.event_id, event_id) {
            (None, _) => true,
            (Some(scope), Some(event)) => scope == event,
            (Some(_), None) => false,
        }
    }

    /// True when the usage cap has been reached.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.max_uses, Some(max) if self.used_count >= max)
    }

    /// Whether one more redemption fits under the cap.
    pub fn can_redeem(&self) -> bool {
        !self.is_exhausted()
    }

    /// Checks the usage cap and minimum order, then computes the discount.
    ///
    /// Usage is checked before the minimum so an exhausted code reports as
    /// exhausted whatever the basket.
    pub fn evaluate(&self, subtotal: Money) -> Result<Money, PromoError> {
        if self.is_exhausted() {
            return Err(PromoError::usage_limit_exceeded(self.code.as_str()));
        }

        if let Some(minimum) = self.min_amount {
            if subtotal < minimum {
                return Err(PromoError::MinimumNotMet {
                    code: self.code.to_string(),
                    minimum,
                    subtotal,
                });
            }
        }

        Ok(self.discount.amount_for(subtotal))
    }
}

/// Picks the promotion to apply from the rows matching a code.
///
/// An event-scoped row beats a global one; otherwise the first row wins.
pub fn select_for_event(candidates: Vec<Promotion>, event_id: Option<&EventId>) -> Option<Promotion> {
    let scoped = event_id.and_then(|event| {
        candidates
            .iter()
            .position(|p| p.event_id.as_ref() == Some(event))
    });

    match scoped {
        Some(index) => candidates.into_iter().nth(index),
        None => candidates.into_iter().next(),
    }
}
