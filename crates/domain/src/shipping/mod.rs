//! Shipping address and shipping method entities.

mod address;
mod method;

pub use address::{AddressFields, ShippingAddress};
pub use method::ShippingMethod;

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur constructing or updating shipping entities.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// A required field was empty.
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// Method price cannot be negative.
    #[error("price cannot be negative (got {price})")]
    NegativePrice { price: Decimal },

    /// Delivery estimate must be at least one day.
    #[error("estimated delivery days must be positive")]
    InvalidDeliveryDays,
}
