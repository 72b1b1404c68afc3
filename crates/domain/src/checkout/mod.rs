//! Checkout aggregate and related types.

mod aggregate;
mod status;
mod value_objects;

pub use aggregate::Checkout;
pub use status::CheckoutStatus;
pub use value_objects::{CheckoutItem, DeliveryOption, PaymentMethod};

use thiserror::Error;

/// Errors that can occur during checkout operations.
///
/// `InvalidState` is the only state-machine variant; everything else is a
/// validation failure on the caller's input.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Originating cart ID is required.
    #[error("cart ID is required")]
    MissingCartId,

    /// Owning user ID is required.
    #[error("user ID is required")]
    MissingUserId,

    /// A checkout snapshots a non-empty cart.
    #[error("checkout must have at least one item")]
    NoItems,

    /// The delivery option must carry a shipping address ID.
    #[error("shipping address ID is required")]
    MissingShippingAddress,

    /// The delivery option must carry a shipping method ID.
    #[error("shipping method ID is required")]
    MissingShippingMethod,

    /// Payment type is required.
    #[error("payment type is required")]
    MissingPaymentType,

    /// Payment details mapping cannot be empty.
    #[error("payment details are required")]
    MissingPaymentDetails,

    /// Operation not permitted in the current state-machine state.
    #[error("cannot {action} a checkout in {status} status")]
    InvalidState {
        status: CheckoutStatus,
        action: &'static str,
    },
}
