//! Cart snapshot collaborator for checkout initiation.
//!
//! Checkout initiation needs a read-only view of a cart, not the cart
//! gateway itself. The trait keeps the checkout service decoupled from
//! wherever carts happen to live.

use std::sync::Arc;

use async_trait::async_trait;
use common::{CartId, UserId};
use domain::CheckoutItem;
use rust_decimal::Decimal;
use store::CartStore;

use crate::error::Result;

/// Point-in-time view of a cart, sufficient to open a checkout.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub cart_id: CartId,
    pub user_id: UserId,
    pub items: Vec<CheckoutItem>,
    pub subtotal: Decimal,
}

/// Source of cart snapshots.
#[async_trait]
pub trait CartSnapshots: Send + Sync {
    /// Returns a snapshot of the cart, or `None` if it does not exist.
    async fn snapshot(&self, cart_id: CartId) -> Result<Option<CartSnapshot>>;
}

/// Snapshot source backed by the local cart gateway.
pub struct CartStoreSnapshots<S> {
    store: Arc<S>,
}

impl<S> CartStoreSnapshots<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> CartSnapshots for CartStoreSnapshots<S>
where
    S: CartStore,
{
    async fn snapshot(&self, cart_id: CartId) -> Result<Option<CartSnapshot>> {
        let Some(cart) = self.store.find_by_id(cart_id).await? else {
            return Ok(None);
        };

        let items = cart
            .items()
            .iter()
            .map(|item| {
                CheckoutItem::new(
                    item.product_id,
                    item.name.clone(),
                    item.price,
                    item.quantity,
                    item.image_url.clone(),
                )
            })
            .collect();

        Ok(Some(CartSnapshot {
            cart_id: cart.id(),
            user_id: cart.user_id(),
            items,
            subtotal: cart.subtotal(),
        }))
    }
}
