//! Simulated payment gateway.
//!
//! No money moves. Card outcomes come from the test-card table or, for
//! unlisted numbers, from syntactic validation. UPI fails at a configured
//! rate to exercise retry paths. Every success waits out a configured latency
//! first; every input-shape failure returns before any wait.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use secrecy::ExposeSecret;

use super::ids;
use crate::config::PaymentConfig;
use crate::domain::foundation::{Money, Timestamp};
use crate::domain::payment::card::{self, CardExpiry};
use crate::domain::payment::{test_cards, PaymentError, PaymentMethod};
use crate::ports::{
    CardPaymentRequest, PaymentGateway, PaymentResult, RefundRequest, RefundResult,
    UpiPaymentRequest, WalletPaymentRequest,
};

/// Inclusive latency bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRange {
    pub min: Duration,
    pub max: Duration,
}

impl LatencyRange {
    pub fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    pub fn from_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max.max(min)),
        }
    }

    fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Behavior knobs for [`MockPaymentGateway`].
#[derive(Debug, Clone)]
pub struct MockGatewayConfig {
    pub card_latency: LatencyRange,
    pub upi_latency: LatencyRange,
    pub wallet_latency: Duration,
    pub refund_latency: Duration,
    /// Probability in 0.0-1.0; out-of-range values are clamped.
    pub upi_failure_rate: f64,
    pub default_wallet_balance: Money,
    pub default_currency: String,
    pub receipt_base_url: String,
}

impl MockGatewayConfig {
    /// No latency and no random UPI failures.
    pub fn instant() -> Self {
        Self {
            upi_failure_rate: 0.0,
            ..Self::from(&PaymentConfig::instant())
        }
    }

    pub fn with_upi_failure_rate(mut self, rate: f64) -> Self {
        self.upi_failure_rate = rate;
        self
    }

    pub fn with_wallet_latency(mut self, latency: Duration) -> Self {
        self.wallet_latency = latency;
        self
    }

    pub fn with_card_latency(mut self, latency: LatencyRange) -> Self {
        self.card_latency = latency;
        self
    }
}

impl Default for MockGatewayConfig {
    fn default() -> Self {
        Self::from(&PaymentConfig::default())
    }
}

impl From<&PaymentConfig> for MockGatewayConfig {
    fn from(config: &PaymentConfig) -> Self {
        Self {
            card_latency: LatencyRange::from_millis(config.card_min_delay_ms, config.card_max_delay_ms),
            upi_latency: LatencyRange::from_millis(config.upi_min_delay_ms, config.upi_max_delay_ms),
            wallet_latency: Duration::from_millis(config.wallet_delay_ms),
            refund_latency: Duration::from_millis(config.refund_delay_ms),
            upi_failure_rate: config.upi_failure_rate,
            default_wallet_balance: Money::from_major(config.default_wallet_balance),
            default_currency: config.default_currency.clone(),
            receipt_base_url: config.receipt_base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Simulated processor implementing [`PaymentGateway`].
#[derive(Debug, Clone, Default)]
pub struct MockPaymentGateway {
    config: MockGatewayConfig,
}

impl MockPaymentGateway {
    pub fn new(config: MockGatewayConfig) -> Self {
        Self { config }
    }

    /// Gateway with zero latency and no random failures.
    pub fn instant() -> Self {
        Self::new(MockGatewayConfig::instant())
    }

    pub fn config(&self) -> &MockGatewayConfig {
        &self.config
    }

    fn currency(&self, requested: Option<String>) -> String {
        requested
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.config.default_currency.clone())
    }

    fn upi_fails(&self) -> bool {
        let rate = self.config.upi_failure_rate;
        let rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
        rand::thread_rng().gen_bool(rate)
    }

    /// Syntactic checks for cards outside the test table.
    fn validate_card(number: &str, expiry: &str, cvv: &str, holder_name: &str) -> Result<(), PaymentError> {
        if !card::is_valid_number(number) {
            return Err(PaymentError::invalid().with_message("Invalid card number"));
        }

        let expiry = CardExpiry::parse(expiry)
            .map_err(|_| PaymentError::invalid().with_message("Invalid expiry date"))?;
        if !expiry.is_current_or_future(&Timestamp::now()) {
            return Err(PaymentError::expired());
        }

        if !card::is_valid_cvv(cvv, card::detect_brand(number)) {
            return Err(PaymentError::invalid().with_message("Invalid CVV"));
        }

        if holder_name.trim().is_empty() {
            return Err(PaymentError::invalid().with_message("Cardholder name is required"));
        }

        Ok(())
    }

    fn success(&self, method: PaymentMethod, amount: Money, currency: String, message: String) -> PaymentResult {
        let now = Timestamp::now();
        PaymentResult {
            success: true,
            transaction_id: ids::transaction_id(&now),
            order_id: ids::order_id(&now),
            amount,
            currency,
            payment_method: method,
            card_brand: None,
            last4: None,
            timestamp: now.to_rfc3339(),
            message,
            receipt_url: None,
            saved_card_id: None,
            wallet_type: None,
            previous_balance: None,
            new_balance: None,
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn process_card_payment(
        &self,
        request: CardPaymentRequest,
    ) -> Result<PaymentResult, PaymentError> {
        let number = card::normalize_number(request.number.expose_secret());
        let last4 = card::last4(&number);

        let brand = match test_cards::lookup(&number) {
            Some(test_card) => {
                pause(self.config.card_latency.sample()).await;
                if let Some(code) = test_card.status.failure_code() {
                    tracing::warn!(last4 = %last4, code = %code, "Test card payment failed");
                    return Err(PaymentError::new(code));
                }
                test_card.brand
            }
            None => {
                if let Err(err) = Self::validate_card(
                    &number,
                    &request.expiry,
                    request.cvv.expose_secret(),
                    &request.holder_name,
                ) {
                    tracing::warn!(last4 = %last4, code = %err.code, "Card rejected");
                    return Err(err);
                }
                pause(self.config.card_latency.sample()).await;
                card::detect_brand(&number)
            }
        };

        let currency = self.currency(request.currency);
        let mut result = self.success(
            PaymentMethod::Card,
            request.amount,
            currency,
            "Payment successful".to_string(),
        );
        result.receipt_url = Some(format!(
            "{}/{}",
            self.config.receipt_base_url, result.transaction_id
        ));
        result.card_brand = Some(brand);
        result.last4 = Some(last4);
        if request.save_card {
            result.saved_card_id = Some(ids::saved_card_id());
        }

        tracing::info!(
            transaction_id = %result.transaction_id,
            brand = %brand,
            amount = %result.amount,
            "Card payment authorized"
        );
        Ok(result)
    }

    async fn process_upi_payment(
        &self,
        request: UpiPaymentRequest,
    ) -> Result<PaymentResult, PaymentError> {
        if !request.upi_id.contains('@') {
            tracing::warn!(upi_id = %request.upi_id, "Malformed UPI id");
            return Err(PaymentError::invalid_upi_format());
        }

        pause(self.config.upi_latency.sample()).await;

        if self.upi_fails() {
            tracing::warn!(upi_id = %request.upi_id, "Simulated UPI gateway failure");
            return Err(PaymentError::upi_transient_failure());
        }

        let currency = self.currency(request.currency);
        let result = self.success(
            PaymentMethod::Upi,
            request.amount,
            currency,
            "UPI payment successful".to_string(),
        );

        tracing::info!(
            transaction_id = %result.transaction_id,
            amount = %result.amount,
            "UPI payment collected"
        );
        Ok(result)
    }

    async fn process_wallet_payment(
        &self,
        request: WalletPaymentRequest,
    ) -> Result<PaymentResult, PaymentError> {
        let balance = request
            .wallet_balance
            .unwrap_or(self.config.default_wallet_balance);

        if request.amount > balance {
            tracing::warn!(
                wallet = request.wallet_type.display_name(),
                amount = %request.amount,
                balance = %balance,
                "Wallet balance too low"
            );
            return Err(PaymentError::insufficient_wallet_balance());
        }

        pause(self.config.wallet_latency).await;

        let currency = self.currency(request.currency);
        let mut result = self.success(
            PaymentMethod::Wallet,
            request.amount,
            currency,
            format!("Paid with {}", request.wallet_type.display_name()),
        );
        result.wallet_type = Some(request.wallet_type);
        result.previous_balance = Some(balance);
        result.new_balance = Some(balance.saturating_sub(request.amount));

        tracing::info!(
            transaction_id = %result.transaction_id,
            wallet = request.wallet_type.display_name(),
            amount = %result.amount,
            "Wallet payment debited"
        );
        Ok(result)
    }

    async fn refund_payment(&self, request: RefundRequest) -> Result<RefundResult, PaymentError> {
        pause(self.config.refund_latency).await;

        let now = Timestamp::now();
        let result = RefundResult {
            success: true,
            refund_id: ids::refund_id(&now),
            transaction_id: request.transaction_id,
            amount: request.amount,
            reason: request.reason,
            timestamp: now.to_rfc3339(),
            message: "Refund processed".to_string(),
        };

        tracing::info!(
            refund_id = %result.refund_id,
            transaction_id = %result.transaction_id,
            amount = %result.amount,
            "Refund issued"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{CardBrand, PaymentErrorCode, WalletType};

    fn money(units: u64) -> Money {
        Money::from_major(units)
    }

    fn future_expiry() -> String {
        let (year, month) = Timestamp::now().add_days(400).year_month();
        format!("{:02}/{:02}", month, year % 100)
    }

    fn card(number: &str) -> CardPaymentRequest {
        CardPaymentRequest::new(number, future_expiry(), "123", "Asha Rao", money(250))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Card payments
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn success_test_card_authorizes() {
        let gateway = MockPaymentGateway::instant();
        let result = gateway.process_card_payment(card("4242424242424242")).await.unwrap();

        assert!(result.success);
        assert!(result.transaction_id.starts_with("TXN-"));
        assert!(result.order_id.starts_with("ORD-"));
        assert_eq!(result.card_brand, Some(CardBrand::Visa));
        assert_eq!(result.last4.as_deref(), Some("4242"));
        assert_eq!(result.currency, "INR");
        assert_eq!(
            result.receipt_url,
            Some(format!("https://eventsphere.app/receipts/{}", result.transaction_id))
        );
        assert!(result.saved_card_id.is_none());
    }

    #[tokio::test]
    async fn success_test_card_ignores_other_fields() {
        let gateway = MockPaymentGateway::instant();
        let request = CardPaymentRequest::new("4242 4242 4242 4242", "13/99", "1", "", money(1));
        assert!(gateway.process_card_payment(request).await.is_ok());
    }

    #[tokio::test]
    async fn declined_test_card_fails_with_declined() {
        let gateway = MockPaymentGateway::instant();
        let err = gateway.process_card_payment(card("4000000000000002")).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::Declined);
        assert!(!err.retryable);
    }

    #[tokio::test]
    async fn insufficient_funds_and_expired_test_cards() {
        let gateway = MockPaymentGateway::instant();
        let err = gateway.process_card_payment(card("4000000000009995")).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InsufficientFunds);

        let err = gateway.process_card_payment(card("4000000000000069")).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::Expired);
    }

    #[tokio::test]
    async fn unlisted_valid_card_succeeds_with_detected_brand() {
        let gateway = MockPaymentGateway::instant();
        let result = gateway.process_card_payment(card("5105105105105100")).await.unwrap();
        assert_eq!(result.card_brand, Some(CardBrand::Mastercard));
        assert_eq!(result.last4.as_deref(), Some("5100"));
    }

    #[tokio::test]
    async fn unlisted_card_failing_luhn_is_invalid() {
        let gateway = MockPaymentGateway::instant();
        let err = gateway.process_card_payment(card("4242424242424241")).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::Invalid);
    }

    #[tokio::test]
    async fn unlisted_card_with_past_expiry_is_expired() {
        let gateway = MockPaymentGateway::instant();
        let request = CardPaymentRequest::new("5105105105105100", "01/20", "123", "Asha", money(10));
        let err = gateway.process_card_payment(request).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::Expired);
    }

    #[tokio::test]
    async fn unlisted_amex_requires_four_digit_cvv() {
        let gateway = MockPaymentGateway::instant();
        // 340000000000009 is a Luhn-valid amex number outside the test table.
        let request = CardPaymentRequest::new("340000000000009", future_expiry(), "123", "Asha", money(10));
        let err = gateway.process_card_payment(request).await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::Invalid);
    }

    #[tokio::test]
    async fn save_card_returns_saved_card_id() {
        let gateway = MockPaymentGateway::instant();
        let result = gateway
            .process_card_payment(card("4242424242424242").saving_card())
            .await
            .unwrap();
        assert!(result.saved_card_id.unwrap().starts_with("card_"));
    }

    #[tokio::test]
    async fn requested_currency_is_used() {
        let gateway = MockPaymentGateway::instant();
        let result = gateway
            .process_card_payment(card("4242424242424242").with_currency("usd"))
            .await
            .unwrap();
        assert_eq!(result.currency, "USD");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // UPI payments
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn upi_without_at_sign_is_invalid_format() {
        let gateway = MockPaymentGateway::instant();
        let err = gateway
            .process_upi_payment(UpiPaymentRequest::new("asha.okbank", money(100)))
            .await
            .unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidUpiFormat);
        assert!(!err.retryable);
    }

    #[tokio::test]
    async fn upi_succeeds_when_failure_rate_is_zero() {
        let gateway = MockPaymentGateway::instant();
        let result = gateway
            .process_upi_payment(UpiPaymentRequest::new("asha@okbank", money(100)))
            .await
            .unwrap();
        assert_eq!(result.payment_method, PaymentMethod::Upi);
        assert!(result.card_brand.is_none());
    }

    #[tokio::test]
    async fn upi_always_fails_transiently_at_rate_one() {
        let gateway = MockPaymentGateway::new(MockGatewayConfig::instant().with_upi_failure_rate(1.0));
        let err = gateway
            .process_upi_payment(UpiPaymentRequest::new("asha@okbank", money(100)))
            .await
            .unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::UpiTransientFailure);
        assert!(err.retryable);
    }

    #[tokio::test]
    async fn non_finite_failure_rate_never_fails() {
        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let gateway = MockPaymentGateway::new(MockGatewayConfig::instant().with_upi_failure_rate(rate));
            let result = gateway
                .process_upi_payment(UpiPaymentRequest::new("asha@okbank", money(100)))
                .await;
            assert!(result.is_ok(), "rate {} gave {:?}", rate, result);
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Wallet payments and refunds
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn wallet_debit_reports_balances() {
        let gateway = MockPaymentGateway::instant();
        let result = gateway
            .process_wallet_payment(WalletPaymentRequest::new(WalletType::Paytm, money(120)))
            .await
            .unwrap();
        assert_eq!(result.previous_balance, Some(money(500)));
        assert_eq!(result.new_balance, Some(money(380)));
        assert_eq!(result.wallet_type, Some(WalletType::Paytm));
    }

    #[tokio::test]
    async fn wallet_amount_equal_to_balance_is_allowed() {
        let gateway = MockPaymentGateway::instant();
        let result = gateway
            .process_wallet_payment(WalletPaymentRequest::new(WalletType::Phonepe, money(500)))
            .await
            .unwrap();
        assert_eq!(result.new_balance, Some(Money::ZERO));
    }

    #[tokio::test]
    async fn wallet_over_balance_fails() {
        let gateway = MockPaymentGateway::instant();
        let err = gateway
            .process_wallet_payment(
                WalletPaymentRequest::new(WalletType::Mobikwik, money(80)).with_balance(money(50)),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InsufficientWalletBalance);
    }

    #[tokio::test]
    async fn refund_references_original_transaction() {
        let gateway = MockPaymentGateway::instant();
        let result = gateway
            .refund_payment(RefundRequest {
                transaction_id: "TXN-ABC-123456".to_string(),
                amount: money(40),
                reason: Some("event cancelled".to_string()),
            })
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.refund_id.starts_with("REF-"));
        assert_eq!(result.transaction_id, "TXN-ABC-123456");
    }

    #[test]
    fn config_conversion_keeps_settings() {
        let config = MockGatewayConfig::from(&PaymentConfig {
            receipt_base_url: "https://r.example/".to_string(),
            ..Default::default()
        });
        assert_eq!(config.card_latency, LatencyRange::from_millis(1500, 3000));
        assert_eq!(config.receipt_base_url, "https://r.example");
        assert_eq!(config.default_wallet_balance, money(500));
    }

    #[test]
    fn latency_sample_stays_in_range() {
        let range = LatencyRange::from_millis(10, 20);
        for _ in 0..100 {
            let d = range.sample();
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
        }
    }
}
