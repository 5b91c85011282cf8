//! In-memory promo repository for development and tests.
//!
//! Redemption checks and increments under one write lock, which gives the
//! same guarantee as the conditional `UPDATE` in the PostgreSQL adapter.
//! Not shared between processes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EventId, PromoId, Timestamp};
use crate::domain::promo::{demo_promotions, PromoCode, Promotion};
use crate::ports::{PromoRepository, RedemptionOutcome};

/// In-memory promo store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPromoRepository {
    promotions: Arc<RwLock<HashMap<PromoId, Promotion>>>,
}

impl InMemoryPromoRepository {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the demo promotions, valid for a year from now.
    pub fn with_demo_codes() -> Self {
        let promotions = demo_promotions(&Timestamp::now())
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        Self {
            promotions: Arc::new(RwLock::new(promotions)),
        }
    }

    /// Add or replace a promotion.
    pub async fn insert(&self, promotion: Promotion) {
        self.promotions.write().await.insert(promotion.id, promotion);
    }

    /// Number of stored promotions.
    pub async fn len(&self) -> usize {
        self.promotions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.promotions.read().await.is_empty()
    }
}

#[async_trait]
impl PromoRepository for InMemoryPromoRepository {
    async fn find_live_by_code(
        &self,
        code: &PromoCode,
        event_id: Option<&EventId>,
        now: &Timestamp,
    ) -> Result<Vec<Promotion>, DomainError> {
        let promotions = self.promotions.read().await;
        let mut matches: Vec<Promotion> = promotions
            .values()
            .filter(|p| &p.code == code && p.is_live_at(now) && p.applies_to(event_id))
            .cloned()
            .collect();

        // HashMap order is arbitrary; keep results stable for callers.
        matches.sort_by_key(|p| (p.event_id.is_none(), *p.id.as_uuid()));
        Ok(matches)
    }

    async fn find_by_id(&self, id: &PromoId) -> Result<Option<Promotion>, DomainError> {
        Ok(self.promotions.read().await.get(id).cloned())
    }

    async fn record_redemption(&self, id: &PromoId) -> Result<RedemptionOutcome, DomainError> {
        let mut promotions = self.promotions.write().await;
        let Some(promotion) = promotions.get_mut(id) else {
            return Ok(RedemptionOutcome::NotFound);
        };

        if !promotion.can_redeem() {
            return Ok(RedemptionOutcome::LimitReached);
        }

        promotion.used_count += 1;
        Ok(RedemptionOutcome::Redeemed {
            used_count: promotion.used_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;
    use crate::domain::promo::Discount;
    use rust_decimal::Decimal;

    fn code(s: &str) -> PromoCode {
        PromoCode::try_new(s).unwrap()
    }

    fn promo(s: &str) -> Promotion {
        Promotion::new(
            code(s),
            Discount::fixed(Money::from_major(25)),
            Timestamp::now().add_days(10),
        )
    }

    #[tokio::test]
    async fn demo_store_holds_four_codes() {
        let repo = InMemoryPromoRepository::with_demo_codes();
        assert_eq!(repo.len().await, 4);

        let found = repo
            .find_live_by_code(&code("save20"), None, &Timestamp::now())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].discount.value, Decimal::from(20));
    }

    #[tokio::test]
    async fn lookup_skips_inactive_expired_and_foreign_scope() {
        let repo = InMemoryPromoRepository::new();
        let event = EventId::new();
        let now = Timestamp::now();

        repo.insert(promo("GALA").deactivated()).await;
        let mut expired = promo("GALA");
        expired.expiry_date = now.minus_days(1);
        repo.insert(expired).await;
        repo.insert(promo("GALA").for_event(EventId::new())).await;

        let found = repo.find_live_by_code(&code("GALA"), Some(&event), &now).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn scoped_rows_listed_before_global() {
        let repo = InMemoryPromoRepository::new();
        let event = EventId::new();
        repo.insert(promo("GALA")).await;
        repo.insert(promo("GALA").for_event(event)).await;

        let found = repo
            .find_live_by_code(&code("GALA"), Some(&event), &Timestamp::now())
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].event_id, Some(event));
    }

    #[tokio::test]
    async fn redemption_increments_until_cap() {
        let repo = InMemoryPromoRepository::new();
        let capped = promo("LIMITED").with_max_uses(2);
        let id = capped.id;
        repo.insert(capped).await;

        assert_eq!(
            repo.record_redemption(&id).await.unwrap(),
            RedemptionOutcome::Redeemed { used_count: 1 }
        );
        assert_eq!(
            repo.record_redemption(&id).await.unwrap(),
            RedemptionOutcome::Redeemed { used_count: 2 }
        );
        assert_eq!(
            repo.record_redemption(&id).await.unwrap(),
            RedemptionOutcome::LimitReached
        );
        assert_eq!(repo.find_by_id(&id).await.unwrap().unwrap().used_count, 2);
    }

    #[tokio::test]
    async fn redemption_of_unknown_id_is_not_found() {
        let repo = InMemoryPromoRepository::new();
        assert_eq!(
            repo.record_redemption(&PromoId::new()).await.unwrap(),
            RedemptionOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn concurrent_redemptions_respect_cap() {
        let repo = InMemoryPromoRepository::new();
        let capped = promo("RUSH").with_max_uses(5);
        let id = capped.id;
        repo.insert(capped).await;

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.record_redemption(&id).await.unwrap() })
            })
            .collect();

        let mut redeemed = 0;
        for task in tasks {
            if task.await.unwrap().is_redeemed() {
                redeemed += 1;
            }
        }

        assert_eq!(redeemed, 5);
        assert_eq!(repo.find_by_id(&id).await.unwrap().unwrap().used_count, 5);
    }
}
