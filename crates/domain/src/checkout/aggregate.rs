//! Checkout aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CartId, CheckoutId, UserId};
use rust_decimal::Decimal;

use super::{CheckoutError, CheckoutItem, CheckoutStatus, DeliveryOption, PaymentMethod};

/// Checkout aggregate root.
///
/// Tracks a purchase's progression from cart snapshot through shipping and
/// payment selection to completion or cancellation. Items and subtotal are
/// immutable after creation; `total = subtotal + shipping_cost + tax` holds
/// after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    id: CheckoutId,
    cart_id: CartId,
    user_id: UserId,
    status: CheckoutStatus,
    items: Vec<CheckoutItem>,
    subtotal: Decimal,
    shipping_cost: Decimal,
    tax: Decimal,
    total: Decimal,
    delivery_option: Option<DeliveryOption>,
    payment_method: Option<PaymentMethod>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl Checkout {
    /// Creates a checkout from a non-empty cart snapshot.
    pub fn new(
        cart_id: CartId,
        user_id: UserId,
        items: Vec<CheckoutItem>,
        subtotal: Decimal,
    ) -> Result<Self, CheckoutError> {
        if cart_id.as_uuid().is_nil() {
            return Err(CheckoutError::MissingCartId);
        }
        if user_id.as_uuid().is_nil() {
            return Err(CheckoutError::MissingUserId);
        }
        if items.is_empty() {
            return Err(CheckoutError::NoItems);
        }

        let now = Utc::now();
        Ok(Self {
            id: CheckoutId::new(),
            cart_id,
            user_id,
            status: CheckoutStatus::Initiated,
            items,
            subtotal,
            shipping_cost: Decimal::ZERO,
            tax: Decimal::ZERO,
            // Nothing but the snapshot is priced in yet.
            total: subtotal,
            delivery_option: None,
            payment_method: None,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Reconstructs a checkout from its persisted representation.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: CheckoutId,
        cart_id: CartId,
        user_id: UserId,
        status: CheckoutStatus,
        items: Vec<CheckoutItem>,
        subtotal: Decimal,
        shipping_cost: Decimal,
        tax: Decimal,
        total: Decimal,
        delivery_option: Option<DeliveryOption>,
        payment_method: Option<PaymentMethod>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        version: i64,
    ) -> Self {
        Self {
            id,
            cart_id,
            user_id,
            status,
            items,
            subtotal,
            shipping_cost,
            tax,
            total,
            delivery_option,
            payment_method,
            created_at,
            updated_at,
            version,
        }
    }

    /// Stores the delivery option and the shipping cost it implies.
    ///
    /// Allowed in every non-cancelled state; re-selection after payment
    /// selection drops the status back to `ShippingSelected`, forcing the
    /// payment step to be repeated. Tax is not recomputed here — callers
    /// apply `calculate_tax` separately.
    pub fn set_delivery_option(
        &mut self,
        option: DeliveryOption,
        shipping_cost: Decimal,
    ) -> Result<(), CheckoutError> {
        if self.status == CheckoutStatus::Cancelled {
            return Err(CheckoutError::InvalidState {
                status: self.status,
                action: "update shipping for",
            });
        }
        if option.shipping_address_id.as_uuid().is_nil() {
            return Err(CheckoutError::MissingShippingAddress);
        }
        if option.shipping_method_id.as_uuid().is_nil() {
            return Err(CheckoutError::MissingShippingMethod);
        }

        self.delivery_option = Some(option);
        self.shipping_cost = shipping_cost;
        self.status = CheckoutStatus::ShippingSelected;
        self.update_total();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Recomputes tax as `(subtotal + shipping_cost) × rate`.
    ///
    /// Deliberately unguarded by status: the aggregate permits recalculation
    /// on terminal checkouts and leaves any tightening to callers.
    pub fn calculate_tax(&mut self, rate: Decimal) {
        self.tax = (self.subtotal + self.shipping_cost) * rate;
        self.update_total();
        self.updated_at = Utc::now();
    }

    /// Captures the payment method. Shipping must have been selected first.
    pub fn set_payment_method(
        &mut self,
        payment_type: impl Into<String>,
        payment_details: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), CheckoutError> {
        if self.status == CheckoutStatus::Cancelled {
            return Err(CheckoutError::InvalidState {
                status: self.status,
                action: "set a payment method for",
            });
        }
        if self.status == CheckoutStatus::Initiated {
            return Err(CheckoutError::InvalidState {
                status: self.status,
                action: "set a payment method for",
            });
        }

        let payment_type = payment_type.into();
        if payment_type.is_empty() {
            return Err(CheckoutError::MissingPaymentType);
        }
        if payment_details.is_empty() {
            return Err(CheckoutError::MissingPaymentDetails);
        }

        self.payment_method = Some(PaymentMethod {
            payment_type,
            payment_details,
        });
        self.status = CheckoutStatus::PaymentSelected;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Marks the checkout as completed.
    pub fn complete(&mut self) -> Result<(), CheckoutError> {
        if self.status == CheckoutStatus::Cancelled {
            return Err(CheckoutError::InvalidState {
                status: self.status,
                action: "complete",
            });
        }
        if self.status != CheckoutStatus::PaymentSelected {
            return Err(CheckoutError::InvalidState {
                status: self.status,
                action: "complete",
            });
        }

        self.status = CheckoutStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Marks the checkout as cancelled. No-op on a completed checkout.
    pub fn cancel(&mut self) {
        if self.status != CheckoutStatus::Completed {
            self.status = CheckoutStatus::Cancelled;
            self.updated_at = Utc::now();
        }
    }

    fn update_total(&mut self) {
        self.total = self.subtotal + self.shipping_cost + self.tax;
    }

    pub fn is_completed(&self) -> bool {
        self.status == CheckoutStatus::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == CheckoutStatus::Cancelled
    }

    pub fn id(&self) -> CheckoutId {
        self.id
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn status(&self) -> CheckoutStatus {
        self.status
    }

    pub fn items(&self) -> &[CheckoutItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn shipping_cost(&self) -> Decimal {
        self.shipping_cost
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn delivery_option(&self) -> Option<&DeliveryOption> {
        self.delivery_option.as_ref()
    }

    pub fn payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_method.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Persistence version for optimistic concurrency.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}
