//! Shipping application service.

use std::sync::Arc;

use common::{AddressId, ShippingMethodId, UserId};
use domain::{AddressFields, ShippingAddress, ShippingMethod};
use store::ShippingStore;

use crate::error::{Result, ServiceError};

/// Orchestrates shipping addresses and the shipping method catalog.
pub struct ShippingService<S> {
    store: Arc<S>,
}

impl<S> ShippingService<S>
where
    S: ShippingStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a new address for the user.
    #[tracing::instrument(skip(self, fields))]
    pub async fn add_address(
        &self,
        user_id: UserId,
        fields: AddressFields,
    ) -> Result<ShippingAddress> {
        let address = ShippingAddress::new(user_id, fields)?;
        self.store.save_address(&address).await?;
        tracing::info!(address_id = %address.id, "shipping address created");
        Ok(address)
    }

    /// Returns an address, verifying it belongs to the requesting user.
    pub async fn get_address(
        &self,
        address_id: AddressId,
        user_id: UserId,
    ) -> Result<ShippingAddress> {
        let address = self
            .store
            .find_address_by_id(address_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "shipping address",
                id: address_id.as_uuid(),
            })?;
        if address.user_id != user_id {
            return Err(ServiceError::Forbidden {
                entity: "shipping address",
            });
        }
        Ok(address)
    }

    /// Lists the user's addresses, default first, then newest first.
    pub async fn get_addresses(&self, user_id: UserId) -> Result<Vec<ShippingAddress>> {
        Ok(self.store.find_addresses_by_user_id(user_id).await?)
    }

    /// Replaces an address's details after an ownership check.
    #[tracing::instrument(skip(self, fields))]
    pub async fn update_address(
        &self,
        address_id: AddressId,
        user_id: UserId,
        fields: AddressFields,
    ) -> Result<ShippingAddress> {
        let mut address = self.get_address(address_id, user_id).await?;
        address.update(fields)?;
        self.store.save_address(&address).await?;
        Ok(address)
    }

    /// Deletes an address after an ownership check.
    #[tracing::instrument(skip(self))]
    pub async fn delete_address(&self, address_id: AddressId, user_id: UserId) -> Result<()> {
        self.get_address(address_id, user_id).await?;
        self.store.delete_address(address_id).await?;
        Ok(())
    }

    /// Lists all active shipping methods, cheapest first.
    pub async fn get_methods(&self) -> Result<Vec<ShippingMethod>> {
        Ok(self.store.find_all_methods().await?)
    }

    /// Returns a shipping method by its ID.
    pub async fn get_method(&self, method_id: ShippingMethodId) -> Result<ShippingMethod> {
        self.store
            .find_method_by_id(method_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "shipping method",
                id: method_id.as_uuid(),
            })
    }
}
