//! Promo domain module.
//!
//! # Module Structure
//!
//! - `code` - Normalized promo code value object
//! - `discount` - Discount rules and the capped, clamped computation
//! - `promotion` - Stored promo-code rows and scope selection
//! - `demo` - Seed promotions for the in-memory store
//! - `errors` - Promo error types

mod code;
pub mod demo;
mod discount;
mod errors;
mod promotion;

pub use code::PromoCode;
pub use demo::demo_promotions;
pub use discount::{Discount, DiscountType};
pub use errors::PromoError;
pub use promotion::{select_for_event, Promotion};
