use async_trait::async_trait;
use common::{AddressId, CartId, CheckoutId, ShippingMethodId, UserId};
use domain::{Cart, Checkout, ShippingAddress, ShippingMethod};

use crate::Result;

/// Persistence gateway for the cart aggregate.
///
/// All implementations must be thread-safe (Send + Sync). `save` performs a
/// compare-and-swap upsert: it inserts a fresh aggregate (version 0) at
/// version 1, updates an existing one only when the stored version matches
/// the loaded version, and writes the new version back into the aggregate.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Retrieves a cart by its ID.
    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>>;

    /// Retrieves the user's most recently updated cart.
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Cart>>;

    /// Persists a cart (version-checked upsert).
    async fn save(&self, cart: &mut Cart) -> Result<()>;

    /// Removes a cart. Deleting an absent cart is not an error.
    async fn delete(&self, id: CartId) -> Result<()>;
}

/// Persistence gateway for the checkout aggregate.
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    /// Retrieves a checkout by its ID.
    async fn find_by_id(&self, id: CheckoutId) -> Result<Option<Checkout>>;

    /// Retrieves the most recent checkout created from a cart.
    async fn find_by_cart_id(&self, cart_id: CartId) -> Result<Option<Checkout>>;

    /// Retrieves the user's checkouts, newest first, capped at `limit`.
    async fn find_by_user_id(&self, user_id: UserId, limit: u32) -> Result<Vec<Checkout>>;

    /// Persists a checkout (version-checked upsert).
    async fn save(&self, checkout: &mut Checkout) -> Result<()>;
}

/// Persistence gateway for shipping addresses and methods.
#[async_trait]
pub trait ShippingStore: Send + Sync {
    /// Retrieves a shipping address by its ID.
    async fn find_address_by_id(&self, id: AddressId) -> Result<Option<ShippingAddress>>;

    /// Retrieves all of a user's addresses, default first, then newest first.
    async fn find_addresses_by_user_id(&self, user_id: UserId) -> Result<Vec<ShippingAddress>>;

    /// Persists a shipping address (upsert).
    ///
    /// Saving an address with the default flag set clears the flag on every
    /// other address owned by the same user, atomically with the write, so
    /// at most one default survives concurrent writers.
    async fn save_address(&self, address: &ShippingAddress) -> Result<()>;

    /// Removes a shipping address.
    async fn delete_address(&self, id: AddressId) -> Result<()>;

    /// Retrieves a shipping method by its ID.
    async fn find_method_by_id(&self, id: ShippingMethodId) -> Result<Option<ShippingMethod>>;

    /// Retrieves all active shipping methods, cheapest first.
    async fn find_all_methods(&self) -> Result<Vec<ShippingMethod>>;
}
