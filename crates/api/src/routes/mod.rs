//! HTTP route handlers.

pub mod carts;
pub mod checkout;
pub mod health;
pub mod metrics;
pub mod shipping;

use services::{CartService, CartStoreSnapshots, CheckoutService, ShippingService};
use store::{CartStore, CheckoutStore, ShippingStore};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C: CartStore, K: CheckoutStore, S: ShippingStore> {
    pub carts: CartService<C>,
    pub checkouts: CheckoutService<K, CartStoreSnapshots<C>, S>,
    pub shipping: ShippingService<S>,
}

pub(crate) fn parse_uuid(id: &str, what: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(id).map_err(|e| ApiError::BadRequest(format!("Invalid {what}: {e}")))
}
