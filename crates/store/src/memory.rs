use std::collections::HashMap;

use async_trait::async_trait;
use common::{AddressId, CartId, CheckoutId, ShippingMethodId, UserId};
use domain::{Cart, Checkout, ShippingAddress, ShippingMethod};
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    store::{CartStore, CheckoutStore, ShippingStore},
};

/// In-memory cart gateway for tests and local runs.
///
/// Honors the same compare-and-swap contract as the Postgres store.
#[derive(Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<CartId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>> {
        Ok(self.carts.read().await.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts
            .values()
            .filter(|cart| cart.user_id() == user_id)
            .max_by_key(|cart| cart.updated_at())
            .cloned())
    }

    async fn save(&self, cart: &mut Cart) -> Result<()> {
        let mut carts = self.carts.write().await;
        let loaded_version = cart.version();
        let stored_version = carts.get(&cart.id()).map(Cart::version);

        let conflict = match stored_version {
            None => loaded_version != 0,
            Some(stored) => stored != loaded_version,
        };
        if conflict {
            return Err(StoreError::VersionConflict {
                entity: "cart",
                id: cart.id().as_uuid(),
            });
        }

        cart.set_version(loaded_version + 1);
        carts.insert(cart.id(), cart.clone());
        Ok(())
    }

    async fn delete(&self, id: CartId) -> Result<()> {
        self.carts.write().await.remove(&id);
        Ok(())
    }
}

/// In-memory checkout gateway for tests and local runs.
#[derive(Default)]
pub struct InMemoryCheckoutStore {
    checkouts: RwLock<HashMap<CheckoutId, Checkout>>,
}

impl InMemoryCheckoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckoutStore for InMemoryCheckoutStore {
    async fn find_by_id(&self, id: CheckoutId) -> Result<Option<Checkout>> {
        Ok(self.checkouts.read().await.get(&id).cloned())
    }

    async fn find_by_cart_id(&self, cart_id: CartId) -> Result<Option<Checkout>> {
        let checkouts = self.checkouts.read().await;
        Ok(checkouts
            .values()
            .filter(|checkout| checkout.cart_id() == cart_id)
            .max_by_key(|checkout| checkout.created_at())
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: UserId, limit: u32) -> Result<Vec<Checkout>> {
        let checkouts = self.checkouts.read().await;
        let mut matching: Vec<Checkout> = checkouts
            .values()
            .filter(|checkout| checkout.user_id() == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn save(&self, checkout: &mut Checkout) -> Result<()> {
        let mut checkouts = self.checkouts.write().await;
        let loaded_version = checkout.version();
        let stored_version = checkouts.get(&checkout.id()).map(Checkout::version);

        let conflict = match stored_version {
            None => loaded_version != 0,
            Some(stored) => stored != loaded_version,
        };
        if conflict {
            return Err(StoreError::VersionConflict {
                entity: "checkout",
                id: checkout.id().as_uuid(),
            });
        }

        checkout.set_version(loaded_version + 1);
        checkouts.insert(checkout.id(), checkout.clone());
        Ok(())
    }
}

/// In-memory shipping gateway for tests and local runs.
#[derive(Default)]
pub struct InMemoryShippingStore {
    addresses: RwLock<HashMap<AddressId, ShippingAddress>>,
    methods: RwLock<HashMap<ShippingMethodId, ShippingMethod>>,
}

impl InMemoryShippingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a shipping method, bypassing the address default logic.
    pub async fn insert_method(&self, method: ShippingMethod) {
        self.methods.write().await.insert(method.id, method);
    }
}

#[async_trait]
impl ShippingStore for InMemoryShippingStore {
    async fn find_address_by_id(&self, id: AddressId) -> Result<Option<ShippingAddress>> {
        Ok(self.addresses.read().await.get(&id).cloned())
    }

    async fn find_addresses_by_user_id(&self, user_id: UserId) -> Result<Vec<ShippingAddress>> {
        let addresses = self.addresses.read().await;
        let mut matching: Vec<ShippingAddress> = addresses
            .values()
            .filter(|address| address.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(matching)
    }

    async fn save_address(&self, address: &ShippingAddress) -> Result<()> {
        let mut addresses = self.addresses.write().await;
        if address.is_default {
            for other in addresses.values_mut() {
                if other.user_id == address.user_id && other.id != address.id {
                    other.is_default = false;
                }
            }
        }
        addresses.insert(address.id, address.clone());
        Ok(())
    }

    async fn delete_address(&self, id: AddressId) -> Result<()> {
        self.addresses.write().await.remove(&id);
        Ok(())
    }

    async fn find_method_by_id(&self, id: ShippingMethodId) -> Result<Option<ShippingMethod>> {
        Ok(self.methods.read().await.get(&id).cloned())
    }

    async fn find_all_methods(&self) -> Result<Vec<ShippingMethod>> {
        let methods = self.methods.read().await;
        let mut active: Vec<ShippingMethod> = methods
            .values()
            .filter(|method| method.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.price.cmp(&b.price));
        Ok(active)
    }
}
