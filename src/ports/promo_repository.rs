//! Promo repository port.
//!
//! Lookup and redemption of stored promo codes. Creating and editing
//! promotions is plain persistence owned by the admin surface and is not
//! part of this contract.
//!
//! # Redemption
//!
//! `record_redemption` must be a single atomic check-and-increment, the
//! equivalent of:
//!
//! ```sql
//! UPDATE promo_codes SET used_count = used_count + 1
//! WHERE id = $1 AND (max_uses IS NULL OR used_count < max_uses)
//! ```
//!
//! Two concurrent redemptions of a code with one use left must not both
//! succeed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, PromoId, Timestamp};
use crate::domain::promo::{PromoCode, Promotion};

/// Repository port for promotions.
#[async_trait]
pub trait PromoRepository: Send + Sync {
    /// Find live promotions for a code.
    ///
    /// Returns rows that are active, expire after `now`, and are either
    /// global or scoped to `event_id`. Order is unspecified; callers pick
    /// with [`crate::domain::promo::select_for_event`].
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on query failure
    async fn find_live_by_code(
        &self,
        code: &PromoCode,
        event_id: Option<&EventId>,
        now: &Timestamp,
    ) -> Result<Vec<Promotion>, DomainError>;

    /// Find a promotion by ID regardless of state.
    async fn find_by_id(&self, id: &PromoId) -> Result<Option<Promotion>, DomainError>;

    /// Atomically increment the used count if the cap allows it.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn record_redemption(&self, id: &PromoId) -> Result<RedemptionOutcome, DomainError>;
}

/// Result of a redemption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionOutcome {
    /// Counted; carries the new used count.
    Redeemed { used_count: u32 },
    /// The cap was already reached; nothing changed.
    LimitReached,
    /// No promotion with that ID.
    NotFound,
}

impl RedemptionOutcome {
    pub fn is_redeemed(&self) -> bool {
        matches!(self, RedemptionOutcome::Redeemed { .. })
    }
}
