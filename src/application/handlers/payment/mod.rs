//! Payment command handlers.

mod process_payment;
mod refund_payment;

pub use process_payment::{PaymentInstrument, ProcessPaymentCommand, ProcessPaymentHandler};
pub use refund_payment::{RefundPaymentCommand, RefundPaymentHandler};
