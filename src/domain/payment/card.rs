//! Card validation: brand detection, Luhn checksum, expiry and CVV format.
//!
//! All functions are pure. Whitespace inside card numbers is ignored, so
//! `"4242 4242 4242 4242"` and `"4242424242424242"` are equivalent.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Card network inferred from the leading digits of the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Jcb,
    Unknown,
}

impl CardBrand {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
            CardBrand::Discover => "discover",
            CardBrand::Jcb => "jcb",
            CardBrand::Unknown => "unknown",
        }
    }

    /// Number of digits the card security code must have.
    pub fn cvv_length(&self) -> usize {
        match self {
            CardBrand::Amex => 4,
            _ => 3,
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Removes all whitespace from a card number.
pub fn normalize_number(number: &str) -> String {
    number.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Detects the card brand from the number prefix.
///
/// Prefix rules are checked in order and the first match wins:
/// `4` visa, `51`-`55` mastercard, `34`/`37` amex, `6011`/`65` discover,
/// `2131`/`1800`/`35` jcb.
pub fn detect_brand(number: &str) -> CardBrand {
    let digits = normalize_number(number);
    let starts = |prefixes: &[&str]| prefixes.iter().any(|p| digits.starts_with(p));

    if starts(&["4"]) {
        CardBrand::Visa
    } else if starts(&["51", "52", "53", "54", "55"]) {
        CardBrand::Mastercard
    } else if starts(&["34", "37"]) {
        CardBrand::Amex
    } else if starts(&["6011", "65"]) {
        CardBrand::Discover
    } else if starts(&["2131", "1800", "35"]) {
        CardBrand::Jcb
    } else {
        CardBrand::Unknown
    }
}

/// Checks length (13-19 digits) and the Luhn checksum.
pub fn is_valid_number(number: &str) -> bool {
    let digits = normalize_number(number);
    if !(13..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    luhn_sum(&digits) % 10 == 0
}

fn luhn_sum(digits: &str) -> u32 {
    digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum()
}

/// Last four digits of the number, used for display and logging.
pub fn last4(number: &str) -> String {
    let digits = normalize_number(number);
    let start = digits.len().saturating_sub(4);
    digits[start..].to_string()
}

/// A parsed `MM/YY` card expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    month: u32,
    /// Two-digit year (0-99).
    year: u32,
}

impl CardExpiry {
    /// Parses `MM/YY`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the string is not two numeric parts
    /// separated by `/`, or the month is outside 1-12.
    pub fn parse(expiry: &str) -> Result<Self, ValidationError> {
        let (month, year) = expiry.trim().split_once('/').ok_or_else(|| {
            ValidationError::invalid_format("expiry", "expected MM/YY")
        })?;

        let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !numeric(month) || month.len() > 2 || !numeric(year) || year.len() != 2 {
            return Err(ValidationError::invalid_format("expiry", "expected MM/YY"));
        }

        let month: u32 = month
            .parse()
            .map_err(|_| ValidationError::invalid_format("expiry", "expected MM/YY"))?;
        let year: u32 = year
            .parse()
            .map_err(|_| ValidationError::invalid_format("expiry", "expected MM/YY"))?;

        if !(1..=12).contains(&month) {
            return Err(ValidationError::out_of_range(
                "expiry_month",
                1,
                12,
                i64::from(month),
            ));
        }

        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// True when the card is still usable in the month containing `now`.
    pub fn is_current_or_future(&self, now: &Timestamp) -> bool {
        let (year, month) = now.year_month();
        let current_year = year.rem_euclid(100) as u32;
        (self.year, self.month) >= (current_year, month)
    }
}

/// Checks `MM/YY` format and that the card has not expired as of today.
pub fn is_valid_expiry(expiry: &str) -> bool {
    is_valid_expiry_at(expiry, &Timestamp::now())
}

/// Same as [`is_valid_expiry`] against an explicit clock.
pub fn is_valid_expiry_at(expiry: &str, now: &Timestamp) -> bool {
    CardExpiry::parse(expiry)
        .map(|e| e.is_current_or_future(now))
        .unwrap_or(false)
}

/// Checks the security code: 4 digits for amex, 3 for everything else.
pub fn is_valid_cvv(cvv: &str, brand: CardBrand) -> bool {
    cvv.len() == brand.cvv_length() && cvv.chars().all(|c| c.is_ascii_digit())
}
