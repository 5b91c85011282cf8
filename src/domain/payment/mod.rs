//! Payment domain module.
//!
//! # Module Structure
//!
//! - `card` - Card validation (brand, Luhn, expiry, CVV)
//! - `errors` - Payment failure taxonomy
//! - `method` - Payment methods and wallet providers
//! - `test_cards` - Registered test cards for the simulated network

pub mod card;
mod errors;
mod method;
pub mod test_cards;

pub use card::{
    detect_brand, is_valid_cvv, is_valid_expiry, is_valid_expiry_at, is_valid_number, CardBrand,
    CardExpiry,
};
pub use errors::{PaymentError, PaymentErrorCode};
pub use method::{PaymentMethod, WalletType};
pub use test_cards::{TestCard, TestCardStatus};
