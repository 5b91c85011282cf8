//! Discount rules and computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Money, ValidationError};

/// How a promotion's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Value is a percentage of the subtotal (0-100).
    Percentage,
    /// Value is a flat amount off.
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }

    /// Parses the stored column value.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(ValidationError::invalid_format(
                "discount_type",
                format!("expected 'percentage' or 'fixed', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The pricing part of a promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub discount_type: DiscountType,
    #[serde(rename = "discount_value")]
    pub value: Decimal,
    /// Cap on the computed discount, when set.
    pub max_discount: Option<Money>,
}

impl Discount {
    /// A percentage discount, `percent` in 0-100.
    pub fn percentage(percent: Decimal) -> Result<Self, ValidationError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(ValidationError::invalid_format(
                "discount_value",
                format!("percentage must be between 0 and 100, got {}", percent),
            ));
        }
        Ok(Self {
            discount_type: DiscountType::Percentage,
            value: percent,
            max_discount: None,
        })
    }

    /// A flat amount off.
    pub fn fixed(amount: Money) -> Self {
        Self {
            discount_type: DiscountType::Fixed,
            value: amount.value(),
            max_discount: None,
        }
    }

    /// Sets the cap on the computed discount.
    pub fn with_max_discount(mut self, cap: Money) -> Self {
        self.max_discount = Some(cap);
        self
    }

    /// Discount for `subtotal`.
    ///
    /// Never negative, never above `max_discount` when set, never above the
    /// subtotal itself.
    pub fn amount_for(&self, subtotal: Money) -> Money {
        let raw = match self.discount_type {
            DiscountType::Percentage => subtotal.percent(self.value).unwrap_or(subtotal),
            DiscountType::Fixed => Money::try_new(self.value).unwrap_or(Money::ZERO),
        };

        let capped = match self.max_discount {
            Some(cap) => raw.min(cap),
            None => raw,
        };

        capped.min(subtotal)
    }
}
