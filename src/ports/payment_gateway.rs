//! Payment gateway port.
//!
//! Authorizes card, UPI and wallet payments and issues refunds. The only
//! implementation shipped is the simulated gateway in
//! `adapters::mock_gateway`; a real processor would implement the same trait.
//!
//! # Security
//!
//! Card number and CVV are `SecretString` so they never show up in `Debug`
//! output or logs. Results carry the last four digits only.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;

use crate::domain::foundation::Money;
use crate::domain::payment::{CardBrand, PaymentError, PaymentMethod, WalletType};

/// Port for payment authorization.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge a card.
    ///
    /// # Errors
    ///
    /// `declined`, `insufficient_funds`, `expired` or `invalid`.
    async fn process_card_payment(
        &self,
        request: CardPaymentRequest,
    ) -> Result<PaymentResult, PaymentError>;

    /// Collect a UPI payment.
    ///
    /// # Errors
    ///
    /// `invalid_upi_format` or the retryable `upi_transient_failure`.
    async fn process_upi_payment(
        &self,
        request: UpiPaymentRequest,
    ) -> Result<PaymentResult, PaymentError>;

    /// Debit a digital wallet.
    ///
    /// # Errors
    ///
    /// `insufficient_wallet_balance` when the amount exceeds the balance.
    async fn process_wallet_payment(
        &self,
        request: WalletPaymentRequest,
    ) -> Result<PaymentResult, PaymentError>;

    /// Refund a previous payment.
    async fn refund_payment(&self, request: RefundRequest) -> Result<RefundResult, PaymentError>;
}

/// Card charge request.
#[derive(Debug)]
pub struct CardPaymentRequest {
    pub number: SecretString,
    /// `MM/YY`.
    pub expiry: String,
    pub cvv: SecretString,
    pub holder_name: String,
    pub amount: Money,
    /// Falls back to the gateway default when `None`.
    pub currency: Option<String>,
    /// Return a reusable saved-card id on success.
    pub save_card: bool,
}

impl CardPaymentRequest {
    pub fn new(
        number: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
        holder_name: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            number: SecretString::new(number.into()),
            expiry: expiry.into(),
            cvv: SecretString::new(cvv.into()),
            holder_name: holder_name.into(),
            amount,
            currency: None,
            save_card: false,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn saving_card(mut self) -> Self {
        self.save_card = true;
        self
    }
}

/// UPI collect request.
#[derive(Debug, Clone)]
pub struct UpiPaymentRequest {
    /// Virtual payment address, e.g. `name@bank`.
    pub upi_id: String,
    pub amount: Money,
    pub currency: Option<String>,
}

impl UpiPaymentRequest {
    pub fn new(upi_id: impl Into<String>, amount: Money) -> Self {
        Self {
            upi_id: upi_id.into(),
            amount,
            currency: None,
        }
    }
}

/// Wallet debit request.
#[derive(Debug, Clone)]
pub struct WalletPaymentRequest {
    pub wallet_type: WalletType,
    pub amount: Money,
    pub currency: Option<String>,
    /// Balance to debit from; the gateway default when `None`.
    pub wallet_balance: Option<Money>,
}

impl WalletPaymentRequest {
    pub fn new(wallet_type: WalletType, amount: Money) -> Self {
        Self {
            wallet_type,
            amount,
            currency: None,
            wallet_balance: None,
        }
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.wallet_balance = Some(balance);
        self
    }
}

/// Refund request.
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub transaction_id: String,
    pub amount: Money,
    pub reason: Option<String>,
}

/// Successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,
    pub transaction_id: String,
    pub order_id: String,
    pub amount: Money,
    pub currency: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_brand: Option<CardBrand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
    /// RFC 3339.
    pub timestamp: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_card_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<WalletType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_balance: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<Money>,
}

/// Completed refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResult {
    pub success: bool,
    pub refund_id: String,
    pub transaction_id: String,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn PaymentGateway) {}

    #[test]
    fn card_request_debug_redacts_number_and_cvv() {
        let request = CardPaymentRequest::new(
            "4242424242424242",
            "12/30",
            "123",
            "Asha Rao",
            Money::from_major(100),
        );
        let debug = format!("{:?}", request);
        assert!(!debug.contains("4242424242424242"));
        assert!(!debug.contains("\"123\""));
        assert!(debug.contains("Asha Rao"));
    }

    #[test]
    fn payment_result_serializes_camel_case_and_skips_empty() {
        let result = PaymentResult {
            success: true,
            transaction_id: "TXN-1-ABC".to_string(),
            order_id: "ORD-1".to_string(),
            amount: Money::from_major(10),
            currency: "INR".to_string(),
            payment_method: PaymentMethod::Upi,
            card_brand: None,
            last4: None,
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            message: "ok".to_string(),
            receipt_url: None,
            saved_card_id: None,
            wallet_type: None,
            previous_balance: None,
            new_balance: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["transactionId"], "TXN-1-ABC");
        assert_eq!(json["paymentMethod"], "upi");
        assert!(json.get("cardBrand").is_none());
        assert!(json.get("receiptUrl").is_none());
    }
}
