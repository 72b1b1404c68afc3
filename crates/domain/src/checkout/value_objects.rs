//! Value objects owned by the checkout aggregate.

use common::{AddressId, ProductId, ShippingMethodId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cart line frozen into a checkout at initiation time.
///
/// Unlike a cart line, the per-line subtotal is stored rather than derived:
/// the snapshot must not change if product pricing changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
    pub image_url: String,
}

impl CheckoutItem {
    /// Creates a checkout line, computing the stored subtotal.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            price,
            quantity,
            subtotal: price * Decimal::from(quantity),
            image_url: image_url.into(),
        }
    }
}

/// Shipping address + shipping method chosen for a checkout.
///
/// Set atomically with the shipping cost the method implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOption {
    pub shipping_address_id: AddressId,
    pub shipping_method_id: ShippingMethodId,
}

impl DeliveryOption {
    pub fn new(shipping_address_id: AddressId, shipping_method_id: ShippingMethodId) -> Self {
        Self {
            shipping_address_id,
            shipping_method_id,
        }
    }
}

/// Captured payment method: a type plus a free-form details document.
///
/// The details mapping is an open key-value document, not a closed schema,
/// so arbitrary payment-processor fields pass through untouched. Capture
/// only; charging happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub payment_type: String,
    pub payment_details: serde_json::Map<String, serde_json::Value>,
}
