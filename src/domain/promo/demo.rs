//! Demo promotions seeded into the in-memory repository.

use rust_decimal::Decimal;

use super::{Discount, PromoCode, Promotion};
use crate::domain::foundation::{Money, Timestamp};

/// Days until a seeded demo promotion expires.
const DEMO_VALIDITY_DAYS: i64 = 365;

struct DemoRow {
    code: &'static str,
    discount: DemoDiscount,
    min_amount: Option<u64>,
    max_discount: Option<u64>,
    description: &'static str,
}

enum DemoDiscount {
    Percent(i64),
    Fixed(u64),
}

const DEMO_ROWS: [DemoRow; 4] = [
    DemoRow {
        code: "WELCOME10",
        discount: DemoDiscount::Percent(10),
        min_amount: Some(50),
        max_discount: None,
        description: "10% off for new customers",
    },
    DemoRow {
        code: "SAVE20",
        discount: DemoDiscount::Percent(20),
        min_amount: None,
        max_discount: Some(100),
        description: "20% off, up to 100",
    },
    DemoRow {
        code: "FLAT50",
        discount: DemoDiscount::Fixed(50),
        min_amount: Some(200),
        max_discount: None,
        description: "50 off orders of 200 or more",
    },
    DemoRow {
        code: "EARLYBIRD",
        discount: DemoDiscount::Percent(15),
        min_amount: Some(100),
        max_discount: Some(150),
        description: "15% early-bird discount, up to 150",
    },
];

/// Global demo promotions expiring a year after `now`.
pub fn demo_promotions(now: &Timestamp) -> Vec<Promotion> {
    let expiry = now.add_days(DEMO_VALIDITY_DAYS);

    DEMO_ROWS
        .iter()
        .filter_map(|row| {
            let code = PromoCode::try_new(row.code).ok()?;
            let mut discount = match row.discount {
                DemoDiscount::Percent(p) => Discount::percentage(Decimal::from(p)).ok()?,
                DemoDiscount::Fixed(amount) => Discount::fixed(Money::from_major(amount)),
            };
            if let Some(cap) = row.max_discount {
                discount = discount.with_max_discount(Money::from_major(cap));
            }

            let mut promo = Promotion::new(code, discount, expiry).with_description(row.description);
            if let Some(min) = row.min_amount {
                promo = promo.with_min_amount(Money::from_major(min));
            }
            Some(promo)
        })
        .collect()
}
