//! PostgreSQL implementation of PromoRepository.
//!
//! Reads and redeems rows in the `promo_codes` table. Codes are stored in
//! their normalized uppercase form so lookups are plain equality.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EventId, Money, PromoId, Timestamp, ValidationError};
use crate::domain::promo::{Discount, DiscountType, PromoCode, Promotion};
use crate::ports::{PromoRepository, RedemptionOutcome};

/// PostgreSQL implementation of the PromoRepository port.
pub struct PostgresPromoRepository {
    pool: PgPool,
}

impl PostgresPromoRepository {
    /// Creates a new PostgresPromoRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts promotions, skipping any whose (code, scope) already exists.
    ///
    /// Returns the number of rows inserted.
    pub async fn seed(&self, promotions: &[Promotion]) -> Result<u64, DomainError> {
        let mut inserted = 0;
        for promo in promotions {
            let result = sqlx::query(
                r#"
                INSERT INTO promo_codes (
                    id, code, discount_type, discount_value, min_amount, max_discount,
                    max_uses, used_count, event_id, is_active, expiry_date, description
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(promo.id.as_uuid())
            .bind(promo.code.as_str())
            .bind(promo.discount.discount_type.as_str())
            .bind(promo.discount.value)
            .bind(promo.min_amount.map(|m| m.value()))
            .bind(promo.discount.max_discount.map(|m| m.value()))
            .bind(promo.max_uses.map(|n| n as i32))
            .bind(promo.used_count as i32)
            .bind(promo.event_id.map(|e| *e.as_uuid()))
            .bind(promo.is_active)
            .bind(promo.expiry_date.as_datetime())
            .bind(&promo.description)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to seed promo code", e))?;

            inserted += result.rows_affected();
        }
        Ok(inserted)
    }
}

/// Database row representation of a promo code.
#[derive(Debug, sqlx::FromRow)]
struct PromoRow {
    id: Uuid,
    code: String,
    discount_type: String,
    discount_value: Decimal,
    min_amount: Option<Decimal>,
    max_discount: Option<Decimal>,
    max_uses: Option<i32>,
    used_count: i32,
    event_id: Option<Uuid>,
    is_active: bool,
    expiry_date: DateTime<Utc>,
    description: Option<String>,
}

impl TryFrom<PromoRow> for Promotion {
    type Error = DomainError;

    fn try_from(row: PromoRow) -> Result<Self, Self::Error> {
        let promo_id = row.id;
        let corrupt = |field: &str, e: &ValidationError| {
            DomainError::corrupt_record(field, e).with_detail("promo_id", promo_id.to_string())
        };

        let code = PromoCode::try_new(&row.code).map_err(|e| corrupt("code", &e))?;
        let discount_type =
            DiscountType::parse(&row.discount_type).map_err(|e| corrupt("discount_type", &e))?;
        let money = |value: Decimal, field: &str| Money::try_new(value).map_err(|e| corrupt(field, &e));

        let mut discount = match discount_type {
            DiscountType::Percentage => {
                Discount::percentage(row.discount_value).map_err(|e| corrupt("discount_value", &e))?
            }
            DiscountType::Fixed => Discount::fixed(money(row.discount_value, "discount_value")?),
        };
        if let Some(cap) = row.max_discount {
            discount = discount.with_max_discount(money(cap, "max_discount")?);
        }

        Ok(Promotion {
            id: PromoId::from_uuid(row.id),
            code,
            discount,
            min_amount: row.min_amount.map(|m| money(m, "min_amount")).transpose()?,
            max_uses: row.max_uses.map(|n| n.max(0) as u32),
            used_count: row.used_count.max(0) as u32,
            event_id: row.event_id.map(EventId::from_uuid),
            is_active: row.is_active,
            expiry_date: Timestamp::from_datetime(row.expiry_date),
            description: row.description,
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, code, discount_type, discount_value, min_amount, max_discount,
           max_uses, used_count, event_id, is_active, expiry_date, description
    FROM promo_codes
"#;

#[async_trait]
impl PromoRepository for PostgresPromoRepository {
    async fn find_live_by_code(
        &self,
        code: &PromoCode,
        event_id: Option<&EventId>,
        now: &Timestamp,
    ) -> Result<Vec<Promotion>, DomainError> {
        let query = format!(
            "{} WHERE code = $1 AND is_active AND expiry_date > $2 \
             AND (event_id IS NULL OR event_id = $3) \
             ORDER BY (event_id IS NULL), created_at",
            SELECT_COLUMNS
        );

        let rows: Vec<PromoRow> = sqlx::query_as(&query)
            .bind(code.as_str())
            .bind(now.as_datetime())
            .bind(event_id.map(|e| *e.as_uuid()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to look up promo code", e))?;

        tracing::debug!(code = %code, candidates = rows.len(), "Promo lookup");
        rows.into_iter().map(Promotion::try_from).collect()
    }

    async fn find_by_id(&self, id: &PromoId) -> Result<Option<Promotion>, DomainError> {
        let query = format!("{} WHERE id = $1", SELECT_COLUMNS);

        let row: Option<PromoRow> = sqlx::query_as(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch promo code", e))?;

        row.map(Promotion::try_from).transpose()
    }

    async fn record_redemption(&self, id: &PromoId) -> Result<RedemptionOutcome, DomainError> {
        let updated: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE promo_codes
            SET used_count = used_count + 1, updated_at = NOW()
            WHERE id = $1 AND (max_uses IS NULL OR used_count < max_uses)
            RETURNING used_count
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to record promo redemption", e))?;

        if let Some((used_count,)) = updated {
            return Ok(RedemptionOutcome::Redeemed {
                used_count: used_count.max(0) as u32,
            });
        }

        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM promo_codes WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check promo code", e))?;

        Ok(if exists.0 {
            RedemptionOutcome::LimitReached
        } else {
            RedemptionOutcome::NotFound
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn row() -> PromoRow {
        PromoRow {
            id: Uuid::new_v4(),
            code: "welcome10".to_string(),
            discount_type: "percentage".to_string(),
            discount_value: Decimal::from(10),
            min_amount: Some(Decimal::from(50)),
            max_discount: None,
            max_uses: Some(100),
            used_count: 7,
            event_id: None,
            is_active: true,
            expiry_date: Utc::now(),
            description: Some("10% off".to_string()),
        }
    }

    #[test]
    fn row_converts_to_promotion() {
        let promo = Promotion::try_from(row()).unwrap();
        assert_eq!(promo.code.as_str(), "WELCOME10");
        assert_eq!(promo.discount.discount_type, DiscountType::Percentage);
        assert_eq!(promo.min_amount, Some(Money::from_major(50)));
        assert_eq!(promo.max_uses, Some(100));
        assert_eq!(promo.used_count, 7);
    }

    #[test]
    fn unknown_discount_type_is_corrupt_record() {
        let mut bad = row();
        let id = bad.id;
        bad.discount_type = "bogo".to_string();
        let err = Promotion::try_from(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::CorruptRecord);
        assert_eq!(err.details.get("field"), Some(&"discount_type".to_string()));
        assert_eq!(err.details.get("promo_id"), Some(&id.to_string()));
    }

    #[test]
    fn out_of_range_percentage_is_database_error() {
        let mut bad = row();
        bad.discount_value = Decimal::from(150);
        assert!(Promotion::try_from(bad).is_err());
    }

    #[test]
    fn negative_min_amount_is_database_error() {
        let mut bad = row();
        bad.min_amount = Some(Decimal::from(-5));
        assert!(Promotion::try_from(bad).is_err());
    }
}
