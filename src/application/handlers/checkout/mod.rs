//! Checkout command handlers.

mod complete_checkout;

pub use complete_checkout::{
    CheckoutError, CheckoutReceipt, CompleteCheckoutCommand, CompleteCheckoutHandler,
};
