use common::{CartItemId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CartError;

/// A single line in a shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line identifier, distinct from the product it references.
    pub id: CartItemId,

    /// The product this line refers to.
    pub product_id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Price per unit.
    pub price: Decimal,

    /// Quantity in the cart.
    pub quantity: u32,

    /// Product image reference.
    pub image_url: String,
}

impl CartItem {
    /// Creates a new cart line, validating quantity and price.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        image_url: impl Into<String>,
    ) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }
        if price.is_sign_negative() {
            return Err(CartError::NegativePrice { price });
        }

        Ok(Self {
            id: CartItemId::new(),
            product_id,
            name: name.into(),
            price,
            quantity,
            image_url: image_url.into(),
        })
    }

    /// Replaces the line quantity, rejecting zero.
    pub fn update_quantity(&mut self, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Returns price × quantity for this line.
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
