//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::checkout::{
    CheckoutError, CheckoutReceipt, CompleteCheckoutCommand, CompleteCheckoutHandler,
};
pub use handlers::payment::{
    PaymentInstrument, ProcessPaymentCommand, ProcessPaymentHandler, RefundPaymentCommand,
    RefundPaymentHandler,
};
pub use handlers::promo::{ValidatePromoCommand, ValidatePromoHandler, ValidatedPromo};
