//! Domain layer for the shopping-experience service.
//!
//! This crate holds the pure domain model:
//! - Cart aggregate with item-quantity and price invariants
//! - Checkout aggregate with its status state machine and totals
//! - Shipping address and shipping method entities
//!
//! No I/O happens here; persistence gateways live in the `store` crate and
//! orchestration in the `services` crate.

pub mod cart;
pub mod checkout;
pub mod shipping;

pub use cart::{Cart, CartError, CartItem};
pub use checkout::{
    Checkout, CheckoutError, CheckoutItem, CheckoutStatus, DeliveryOption, PaymentMethod,
};
pub use shipping::{AddressFields, ShippingAddress, ShippingError, ShippingMethod};
