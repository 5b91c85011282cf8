//! ProcessPaymentHandler - Charges an amount with a chosen instrument.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::foundation::Money;
use crate::domain::payment::{PaymentError, PaymentMethod, WalletType};
use crate::ports::{
    CardPaymentRequest, PaymentGateway, PaymentResult, UpiPaymentRequest, WalletPaymentRequest,
};

/// How the customer pays.
#[derive(Debug)]
pub enum PaymentInstrument {
    Card {
        number: SecretString,
        expiry: String,
        cvv: SecretString,
        holder_name: String,
        save_card: bool,
    },
    Upi {
        upi_id: String,
    },
    Wallet {
        wallet_type: WalletType,
        wallet_balance: Option<Money>,
    },
}

impl PaymentInstrument {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentInstrument::Card { .. } => PaymentMethod::Card,
            PaymentInstrument::Upi { .. } => PaymentMethod::Upi,
            PaymentInstrument::Wallet { .. } => PaymentMethod::Wallet,
        }
    }
}

/// Command to charge an amount.
#[derive(Debug)]
pub struct ProcessPaymentCommand {
    pub instrument: PaymentInstrument,
    pub amount: Money,
    pub currency: Option<String>,
}

/// Handler dispatching a charge to the gateway by payment method.
pub struct ProcessPaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
}

impl ProcessPaymentHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, cmd: ProcessPaymentCommand) -> Result<PaymentResult, PaymentError> {
        let method = cmd.instrument.method();
        tracing::debug!(method = %method, amount = %cmd.amount, "Processing payment");

        let result = match cmd.instrument {
            PaymentInstrument::Card {
                number,
                expiry,
                cvv,
                holder_name,
                save_card,
            } => {
                self.gateway
                    .process_card_payment(CardPaymentRequest {
                        number,
                        expiry,
                        cvv,
                        holder_name,
                        amount: cmd.amount,
                        currency: cmd.currency,
                        save_card,
                    })
                    .await
            }
            PaymentInstrument::Upi { upi_id } => {
                self.gateway
                    .process_upi_payment(UpiPaymentRequest {
                        upi_id,
                        amount: cmd.amount,
                        currency: cmd.currency,
                    })
                    .await
            }
            PaymentInstrument::Wallet {
                wallet_type,
                wallet_balance,
            } => {
                self.gateway
                    .process_wallet_payment(WalletPaymentRequest {
                        wallet_type,
                        amount: cmd.amount,
                        currency: cmd.currency,
                        wallet_balance,
                    })
                    .await
            }
        };

        if let Err(err) = &result {
            tracing::warn!(method = %method, code = %err.code, "Payment failed");
        }
        result
    }
}
