//! Registered test cards for the simulated card network.
//!
//! A card number found here decides the payment outcome on its own. Numbers
//! not listed go through normal syntactic validation and then succeed.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::card::{normalize_number, CardBrand};
use super::errors::PaymentErrorCode;

/// Outcome a test card produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCardStatus {
    Success,
    Declined,
    InsufficientFunds,
    Expired,
}

impl TestCardStatus {
    /// The failure code for a negative outcome, `None` for success.
    pub fn failure_code(&self) -> Option<PaymentErrorCode> {
        match self {
            TestCardStatus::Success => None,
            TestCardStatus::Declined => Some(PaymentErrorCode::Declined),
            TestCardStatus::InsufficientFunds => Some(PaymentErrorCode::InsufficientFunds),
            TestCardStatus::Expired => Some(PaymentErrorCode::Expired),
        }
    }
}

/// A row of the test-card table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestCard {
    pub status: TestCardStatus,
    pub brand: CardBrand,
    pub name: &'static str,
}

static TEST_CARDS: Lazy<HashMap<&'static str, TestCard>> = Lazy::new(|| {
    use CardBrand::*;
    use TestCardStatus::*;

    let rows: [(&str, TestCardStatus, CardBrand, &str); 11] = [
        ("4242424242424242", Success, Visa, "Visa - Success"),
        ("4000056655665556", Success, Visa, "Visa Debit - Success"),
        ("4222222222222", Success, Visa, "Visa 13-digit - Success"),
        ("5555555555554444", Success, Mastercard, "Mastercard - Success"),
        ("378282246310005", Success, Amex, "Amex - Success"),
        ("371449635398431", Success, Amex, "Amex - Success"),
        ("6011111111111117", Success, Discover, "Discover - Success"),
        ("3566002020360505", Success, Jcb, "JCB - Success"),
        ("4000000000000002", Declined, Visa, "Visa - Declined"),
        ("4000000000009995", InsufficientFunds, Visa, "Visa - Insufficient funds"),
        ("4000000000000069", Expired, Visa, "Visa - Expired card"),
    ];

    rows.into_iter()
        .map(|(number, status, brand, name)| (number, TestCard { status, brand, name }))
        .collect()
});

/// Looks up a card number (whitespace ignored) in the test-card table.
pub fn lookup(number: &str) -> Option<TestCard> {
    TEST_CARDS.get(normalize_number(number).as_str()).copied()
}

/// All registered test cards, sorted by number.
pub fn all() -> Vec<(&'static str, TestCard)> {
    let mut cards: Vec<_> = TEST_CARDS.iter().map(|(k, v)| (*k, *v)).collect();
    cards.sort_by_key(|(number, _)| *number);
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::card::{detect_brand, is_valid_number};

    #[test]
    fn declined_card_is_registered() {
        let card = lookup("4000000000000002").unwrap();
        assert_eq!(card.status, TestCardStatus::Declined);
        assert_eq!(card.status.failure_code(), Some(PaymentErrorCode::Declined));
    }

    #[test]
    fn lookup_ignores_whitespace() {
        assert!(lookup("4242 4242 4242 4242").is_some());
    }

    #[test]
    fn unknown_number_is_not_registered() {
        assert!(lookup("4111111111111111").is_none());
    }

    #[test]
    fn table_brands_match_detection() {
        for (number, card) in all() {
            assert_eq!(detect_brand(number), card.brand, "brand mismatch for {}", number);
        }
    }

    #[test]
    fn table_numbers_pass_luhn() {
        for (number, _) in all() {
            assert!(is_valid_number(number), "{} fails Luhn", number);
        }
    }

    #[test]
    fn success_has_no_failure_code() {
        assert_eq!(TestCardStatus::Success.failure_code(), None);
    }
}
