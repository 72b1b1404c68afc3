//! Cart application service.

use std::sync::Arc;

use common::{CartId, CartItemId, ProductId, UserId};
use domain::Cart;
use rust_decimal::Decimal;
use store::CartStore;

use crate::error::{Result, ServiceError};

/// Orchestrates cart operations over the cart gateway.
pub struct CartService<S> {
    store: Arc<S>,
}

impl<S> CartService<S>
where
    S: CartStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the user's current cart, creating an empty one if none exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_or_create_cart(&self, user_id: UserId) -> Result<Cart> {
        if let Some(cart) = self.store.find_by_user_id(user_id).await? {
            return Ok(cart);
        }

        let mut cart = Cart::new(user_id);
        self.store.save(&mut cart).await?;
        metrics::counter!("carts_created_total").increment(1);
        tracing::info!(cart_id = %cart.id(), "cart created");
        Ok(cart)
    }

    /// Returns a cart by its ID.
    pub async fn get_cart(&self, cart_id: CartId) -> Result<Cart> {
        self.store
            .find_by_id(cart_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "cart",
                id: cart_id.as_uuid(),
            })
    }

    /// Adds a product to the cart, merging with an existing line for the
    /// same product.
    #[tracing::instrument(skip(self, name, image_url))]
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        name: String,
        price: Decimal,
        quantity: u32,
        image_url: String,
    ) -> Result<Cart> {
        let mut cart = self.get_cart(cart_id).await?;
        cart.add_item(product_id, name, price, quantity, image_url)?;
        self.store.save(&mut cart).await?;
        metrics::counter!("cart_items_added_total").increment(1);
        Ok(cart)
    }

    /// Replaces the quantity of a cart line.
    #[tracing::instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<Cart> {
        let mut cart = self.get_cart(cart_id).await?;
        cart.update_item_quantity(item_id, quantity)?;
        self.store.save(&mut cart).await?;
        Ok(cart)
    }

    /// Removes a line from the cart.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, cart_id: CartId, item_id: CartItemId) -> Result<Cart> {
        let mut cart = self.get_cart(cart_id).await?;
        cart.remove_item(item_id)?;
        self.store.save(&mut cart).await?;
        Ok(cart)
    }

    /// Empties the cart, keeping the cart itself.
    #[tracing::instrument(skip(self))]
    pub async fn clear_cart(&self, cart_id: CartId) -> Result<Cart> {
        let mut cart = self.get_cart(cart_id).await?;
        cart.clear();
        self.store.save(&mut cart).await?;
        Ok(cart)
    }

    /// Deletes the cart entirely.
    #[tracing::instrument(skip(self))]
    pub async fn delete_cart(&self, cart_id: CartId) -> Result<()> {
        // Load first so a missing cart surfaces as NotFound
        self.get_cart(cart_id).await?;
        self.store.delete(cart_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::InMemoryCartStore;

    fn service() -> CartService<InMemoryCartStore> {
        CartService::new(Arc::new(InMemoryCartStore::new()))
    }

    #[tokio::test]
    async fn get_or_create_returns_same_cart_on_second_call() {
        let service = service();
        let user_id = UserId::new();

        let first = service.get_or_create_cart(user_id).await.unwrap();
        let second = service.get_or_create_cart(user_id).await.unwrap();
        assert_eq!(first.id(), second.id());
    }

    #[tokio::test]
    async fn add_item_merges_lines_for_same_product() {
        let service = service();
        let cart = service.get_or_create_cart(UserId::new()).await.unwrap();
        let product_id = ProductId::new();

        service
            .add_item(
                cart.id(),
                product_id,
                "Widget".to_string(),
                Decimal::new(1000, 2),
                2,
                String::new(),
            )
            .await
            .unwrap();
        let cart = service
            .add_item(
                cart.id(),
                product_id,
                "Widget".to_string(),
                Decimal::new(1000, 2),
                1,
                String::new(),
            )
            .await
            .unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.subtotal(), Decimal::new(3000, 2));
    }

    #[tokio::test]
    async fn add_item_to_missing_cart_is_not_found() {
        let service = service();
        let err = service
            .add_item(
                CartId::new(),
                ProductId::new(),
                "Widget".to_string(),
                Decimal::ONE,
                1,
                String::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "cart", .. }));
    }

    #[tokio::test]
    async fn zero_quantity_is_a_validation_error() {
        let service = service();
        let cart = service.get_or_create_cart(UserId::new()).await.unwrap();

        let err = service
            .add_item(
                cart.id(),
                ProductId::new(),
                "Widget".to_string(),
                Decimal::ONE,
                0,
                String::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn update_and_remove_round_trip() {
        let service = service();
        let cart = service.get_or_create_cart(UserId::new()).await.unwrap();
        let cart = service
            .add_item(
                cart.id(),
                ProductId::new(),
                "Widget".to_string(),
                Decimal::new(500, 2),
                1,
                String::new(),
            )
            .await
            .unwrap();
        let item_id = cart.items()[0].id;

        let cart = service
            .update_item_quantity(cart.id(), item_id, 5)
            .await
            .unwrap();
        assert_eq!(cart.items()[0].quantity, 5);

        let cart = service.remove_item(cart.id(), item_id).await.unwrap();
        assert!(cart.is_empty());

        let err = service
            .remove_item(cart.id(), item_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "cart item",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let service = service();
        let cart = service.get_or_create_cart(UserId::new()).await.unwrap();
        service
            .add_item(
                cart.id(),
                ProductId::new(),
                "Widget".to_string(),
                Decimal::ONE,
                1,
                String::new(),
            )
            .await
            .unwrap();
        let missing = CartItemId::new();

        let err = service
            .update_item_quantity(cart.id(), missing, 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "cart item",
                id
            } if id == missing.as_uuid()
        ));

        let err = service.remove_item(cart.id(), missing).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "cart item",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn clear_keeps_the_cart() {
        let service = service();
        let cart = service.get_or_create_cart(UserId::new()).await.unwrap();
        service
            .add_item(
                cart.id(),
                ProductId::new(),
                "Widget".to_string(),
                Decimal::ONE,
                2,
                String::new(),
            )
            .await
            .unwrap();

        let cleared = service.clear_cart(cart.id()).await.unwrap();
        assert!(cleared.is_empty());
        assert!(service.get_cart(cart.id()).await.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_the_cart() {
        let service = service();
        let cart = service.get_or_create_cart(UserId::new()).await.unwrap();

        service.delete_cart(cart.id()).await.unwrap();
        let err = service.get_cart(cart.id()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let err = service.delete_cart(cart.id()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
