//! Cart aggregate and related types.

mod aggregate;
mod item;

pub use aggregate::Cart;
pub use item::CartItem;

use common::CartItemId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be strictly positive.
    #[error("quantity must be greater than zero (got {quantity})")]
    InvalidQuantity { quantity: u32 },

    /// Unit price cannot be negative.
    #[error("price cannot be negative (got {price})")]
    NegativePrice { price: Decimal },

    /// No line in the cart matches the given item ID.
    #[error("item not found in cart: {item_id}")]
    ItemNotFound { item_id: CartItemId },
}
