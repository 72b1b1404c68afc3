//! Checkout application service.
//!
//! Drives the checkout state machine: initiation from a cart snapshot,
//! shipping selection with tax recalculation, payment capture, completion
//! and cancellation. Every mutation is persisted through the version-checked
//! checkout gateway, so two racing writers cannot both win.

use std::sync::Arc;

use common::{AddressId, CartId, CheckoutId, ShippingMethodId, UserId};
use domain::{Checkout, DeliveryOption};
use rust_decimal::Decimal;
use store::{CheckoutStore, ShippingStore};

use crate::error::{Result, ServiceError};
use crate::snapshot::CartSnapshots;

/// Orchestrates checkout operations.
pub struct CheckoutService<C, P, S> {
    checkouts: Arc<C>,
    carts: P,
    shipping: Arc<S>,
    tax_rate: Decimal,
}

impl<C, P, S> CheckoutService<C, P, S>
where
    C: CheckoutStore,
    P: CartSnapshots,
    S: ShippingStore,
{
    /// Creates a checkout service with the standard 10% tax rate.
    pub fn new(checkouts: Arc<C>, carts: P, shipping: Arc<S>) -> Self {
        Self {
            checkouts,
            carts,
            shipping,
            tax_rate: Decimal::new(1, 1),
        }
    }

    /// Overrides the tax rate applied after shipping selection.
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Opens a checkout from a snapshot of the cart.
    ///
    /// The cart must exist, belong to the requesting user and contain at
    /// least one item. The cart itself is left untouched.
    #[tracing::instrument(skip(self))]
    pub async fn initiate_checkout(&self, cart_id: CartId, user_id: UserId) -> Result<Checkout> {
        let snapshot = self
            .carts
            .snapshot(cart_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "cart",
                id: cart_id.as_uuid(),
            })?;
        if snapshot.user_id != user_id {
            return Err(ServiceError::Forbidden { entity: "cart" });
        }

        let mut checkout = Checkout::new(cart_id, user_id, snapshot.items, snapshot.subtotal)?;
        self.checkouts.save(&mut checkout).await?;
        metrics::counter!("checkouts_initiated_total").increment(1);
        tracing::info!(checkout_id = %checkout.id(), "checkout initiated");
        Ok(checkout)
    }

    /// Returns a checkout, verifying it belongs to the requesting user.
    pub async fn get_checkout(&self, checkout_id: CheckoutId, user_id: UserId) -> Result<Checkout> {
        let checkout = self
            .checkouts
            .find_by_id(checkout_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "checkout",
                id: checkout_id.as_uuid(),
            })?;
        if checkout.user_id() != user_id {
            return Err(ServiceError::Forbidden { entity: "checkout" });
        }
        Ok(checkout)
    }

    /// Returns the most recent checkout opened from a cart.
    pub async fn get_checkout_by_cart(&self, cart_id: CartId, user_id: UserId) -> Result<Checkout> {
        let checkout = self
            .checkouts
            .find_by_cart_id(cart_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "checkout",
                id: cart_id.as_uuid(),
            })?;
        if checkout.user_id() != user_id {
            return Err(ServiceError::Forbidden { entity: "checkout" });
        }
        Ok(checkout)
    }

    /// Lists the user's checkouts, newest first, capped at `limit`.
    pub async fn get_checkouts(&self, user_id: UserId, limit: u32) -> Result<Vec<Checkout>> {
        Ok(self.checkouts.find_by_user_id(user_id, limit).await?)
    }

    /// Selects the shipping address and method, then recalculates tax and
    /// total from the method's price.
    ///
    /// The address must belong to the user and the method must be active.
    /// Selecting shipping after payment drops the checkout back to the
    /// shipping-selected state.
    #[tracing::instrument(skip(self))]
    pub async fn update_shipping(
        &self,
        checkout_id: CheckoutId,
        user_id: UserId,
        address_id: AddressId,
        method_id: ShippingMethodId,
    ) -> Result<Checkout> {
        let mut checkout = self.get_checkout(checkout_id, user_id).await?;

        let address = self
            .shipping
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

        let method = self
            .shipping
            .find_method_by_id(method_id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "shipping method",
                id: method_id.as_uuid(),
            })?;
        if !method.active {
            return Err(ServiceError::Validation(format!(
                "shipping method {} is no longer available",
                method.name
            )));
        }

        checkout.set_delivery_option(DeliveryOption::new(address_id, method_id), method.price)?;
        checkout.calculate_tax(self.tax_rate);
        self.checkouts.save(&mut checkout).await?;
        Ok(checkout)
    }

    /// Captures the payment method for the checkout.
    #[tracing::instrument(skip(self, payment_type, payment_details))]
    pub async fn set_payment_method(
        &self,
        checkout_id: CheckoutId,
        user_id: UserId,
        payment_type: String,
        payment_details: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Checkout> {
        let mut checkout = self.get_checkout(checkout_id, user_id).await?;
        checkout.set_payment_method(payment_type, payment_details)?;
        self.checkouts.save(&mut checkout).await?;
        Ok(checkout)
    }

    /// Completes the checkout. Payment must have been selected.
    #[tracing::instrument(skip(self))]
    pub async fn complete_checkout(
        &self,
        checkout_id: CheckoutId,
        user_id: UserId,
    ) -> Result<Checkout> {
        let mut checkout = self.get_checkout(checkout_id, user_id).await?;
        checkout.complete()?;
        self.checkouts.save(&mut checkout).await?;
        metrics::counter!("checkouts_completed_total").increment(1);
        tracing::info!(checkout_id = %checkout.id(), total = %checkout.total(), "checkout completed");
        Ok(checkout)
    }

    /// Cancels the checkout. Cancelling a completed checkout is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_checkout(
        &self,
        checkout_id: CheckoutId,
        user_id: UserId,
    ) -> Result<Checkout> {
        let mut checkout = self.get_checkout(checkout_id, user_id).await?;
        let was_completed = checkout.is_completed();
        checkout.cancel();
        if !was_completed {
            self.checkouts.save(&mut checkout).await?;
            metrics::counter!("checkouts_cancelled_total").increment(1);
        }
        Ok(checkout)
    }
}
