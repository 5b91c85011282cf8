//! Payment methods and wallet providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Wallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Wallet => "wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Digital wallet provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Paytm,
    Phonepe,
    Amazonpay,
    Mobikwik,
    #[serde(other)]
    Other,
}

impl WalletType {
    /// Display name shown on receipts.
    pub fn display_name(&self) -> &'static str {
        match self {
            WalletType::Paytm => "Paytm",
            WalletType::Phonepe => "PhonePe",
            WalletType::Amazonpay => "Amazon Pay",
            WalletType::Mobikwik => "MobiKwik",
            WalletType::Other => "Wallet",
        }
    }
}
