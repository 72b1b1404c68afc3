//! Shared types for the shopping-experience service.

mod types;

pub use types::{
    AddressId, CartId, CartItemId, CheckoutId, ProductId, ShippingMethodId, UserId,
};
