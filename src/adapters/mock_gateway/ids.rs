//! Synthetic identifiers issued by the simulated gateway.
//!
//! Shapes:
//! - transaction `TXN-<millis base36>-<6 random>`
//! - order `ORD-<millis base36>`
//! - refund `REF-<millis base36>-<6 random>`
//! - saved card `card_<16 random lowercase>`

use rand::Rng;

use crate::domain::foundation::Timestamp;

const BASE36_DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const UPPER_ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWER_ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

const SUFFIX_LEN: usize = 6;
const SAVED_CARD_LEN: usize = 16;

/// Uppercase base-36 rendering of `value`.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

fn millis36(now: &Timestamp) -> String {
    to_base36(now.as_unix_millis().max(0) as u64)
}

pub fn transaction_id(now: &Timestamp) -> String {
    format!("TXN-{}-{}", millis36(now), random_string(UPPER_ALNUM, SUFFIX_LEN))
}

pub fn order_id(now: &Timestamp) -> String {
    format!("ORD-{}", millis36(now))
}

pub fn refund_id(now: &Timestamp) -> String {
    format!("REF-{}-{}", millis36(now), random_string(UPPER_ALNUM, SUFFIX_LEN))
}

pub fn saved_card_id() -> String {
    format!("card_{}", random_string(LOWER_ALNUM, SAVED_CARD_LEN))
}
