//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PromoRepository` - Promo lookup and atomic redemption
//! - `PaymentGateway` - Card, UPI and wallet authorization plus refunds

mod payment_gateway;
mod promo_repository;

pub use payment_gateway::{
    CardPaymentRequest, PaymentGateway, PaymentResult, RefundRequest, RefundResult,
    UpiPaymentRequest, WalletPaymentRequest,
};
pub use promo_repository::{PromoRepository, RedemptionOutcome};
