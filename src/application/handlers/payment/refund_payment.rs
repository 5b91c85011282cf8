//! RefundPaymentHandler - Refunds a previous payment through the gateway.

use std::sync::Arc;

use crate::domain::foundation::Money;
use crate::domain::payment::PaymentError;
use crate::ports::{PaymentGateway, RefundRequest, RefundResult};

/// Command to refund a payment.
#[derive(Debug, Clone)]
pub struct RefundPaymentCommand {
    pub transaction_id: String,
    pub amount: Money,
    pub reason: Option<String>,
}

/// Handler for refunds.
pub struct RefundPaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
}

impl RefundPaymentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, cmd: RefundPaymentCommand) -> Result<RefundResult, PaymentError> {
        let transaction_id = cmd.transaction_id.trim().to_string();
        if transaction_id.is_empty() {
            return Err(PaymentError::invalid().with_message("Transaction id is required"));
        }

        let reason = cmd
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let result = self
            .gateway
            .refund_payment(RefundRequest {
                transaction_id,
                amount: cmd.amount,
                reason,
            })
            .await;

        match &result {
            Ok(refund) => tracing::info!(
                refund_id = %refund.refund_id,
                transaction_id = %refund.transaction_id,
                "Refund completed"
            ),
            Err(err) => tracing::warn!(code = %err.code, "Refund failed"),
        }

        result
    }
}
