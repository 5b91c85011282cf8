//! Money value object.
//!
//! Amounts are non-negative decimals rounded to two places
//! (half away from zero) and no larger than a `NUMERIC(12, 2)` column holds.
//! Currency travels alongside as a plain code.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Decimal places kept for every monetary value.
const DECIMAL_PLACES: u32 = 2;

/// 9,999,999,999.99
const MAX_MINOR_UNITS: i64 = 999_999_999_999;

/// A non-negative monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest representable amount.
    pub const MAX: Self = Self(Decimal::from_parts(
        MAX_MINOR_UNITS as u32,
        (MAX_MINOR_UNITS >> 32) as u32,
        0,
        false,
        DECIMAL_PLACES,
    ));

    /// Creates an amount, rejecting negative values and values above `MAX`.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("must not be negative, got {}", value),
            ));
        }
        let rounded = round(value);
        if rounded > Self::MAX.0 {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("must not exceed {}, got {}", Self::MAX, value),
            ));
        }
        Ok(Self(rounded))
    }

    /// Creates an amount from whole currency units, saturating at `MAX`.
    pub fn from_major(units: u64) -> Self {
        Self(Decimal::from(units).min(Self::MAX.0))
    }

    /// Parses a decimal string such as `"199.99"`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| ValidationError::invalid_format("amount", e.to_string()))?;
        Self::try_new(value)
    }

    /// Returns the inner decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true when the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtracts, flooring at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        if other.0 >= self.0 {
            Money::ZERO
        } else {
            Money(self.0 - other.0)
        }
    }

    /// `percent`% of this amount, rounded to two places.
    ///
    /// Returns `None` when the result does not fit in a `Money`.
    pub fn percent(&self, percent: Decimal) -> Option<Money> {
        let raw = self
            .0
            .checked_mul(percent)?
            .checked_div(Decimal::ONE_HUNDRED)?;
        if raw.is_sign_negative() {
            Some(Money::ZERO)
        } else {
            Money::try_new(raw).ok()
        }
    }
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Serialized amounts always carry two decimal places.
impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        let mut value = money.0;
        value.rescale(DECIMAL_PLACES);
        value
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    #[test]
    fn rejects_negative_amounts() {
        let result = Money::try_new(Decimal::from(-1));
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(money("10.005").value(), Decimal::new(1001, 2));
        assert_eq!(money("10.004").value(), Decimal::new(1000, 2));
    }

    #[test]
    fn percent_of_amount() {
        assert_eq!(money("200").percent(Decimal::from(10)), Some(money("20")));
        assert_eq!(money("99.99").percent(Decimal::from(15)), Some(money("15.00")));
    }

    #[test]
    fn max_is_largest_numeric_12_2_value() {
        assert_eq!(Money::MAX, money("9999999999.99"));
        assert_eq!(Money::MAX.to_string(), "9999999999.99");
    }

    #[test]
    fn rejects_amounts_above_max() {
        assert!(Money::parse("10000000000").is_err());
        assert!(Money::parse("79228162514264337593543950335").is_err());
        assert!(serde_json::from_str::<Money>("\"79228162514264337593543950335\"").is_err());
    }

    #[test]
    fn percent_of_max_does_not_overflow() {
        assert_eq!(Money::MAX.percent(Decimal::ONE_HUNDRED), Some(Money::MAX));
        assert_eq!(Money::MAX.percent(Decimal::MAX), None);
    }

    #[test]
    fn from_major_saturates_at_max() {
        assert_eq!(Money::from_major(u64::MAX), Money::MAX);
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        assert_eq!(money("40").saturating_sub(money("50")), Money::ZERO);
        assert_eq!(money("50").saturating_sub(money("20")), money("30"));
    }

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!(Money::from_major(20).to_string(), "20.00");
    }

    #[test]
    fn deserializes_from_number_and_string() {
        let from_number: Money = serde_json::from_str("12.5").unwrap();
        let from_string: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn serializes_with_two_decimal_places() {
        assert_eq!(serde_json::to_value(Money::from_major(20)).unwrap(), "20.00");
        assert_eq!(serde_json::to_value(money("12.5")).unwrap(), "12.50");
    }

    #[test]
    fn deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Money>("-3").is_err());
    }
}
