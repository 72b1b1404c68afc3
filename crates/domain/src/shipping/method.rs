use common::ShippingMethodId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ShippingError;

/// A shipping method offered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub estimated_delivery_days: u32,
    pub active: bool,
}

impl ShippingMethod {
    /// Creates a new shipping method.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        estimated_delivery_days: u32,
    ) -> Result<Self, ShippingError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ShippingError::MissingField { field: "name" });
        }
        if price.is_sign_negative() {
            return Err(ShippingError::NegativePrice { price });
        }
        if estimated_delivery_days == 0 {
            return Err(ShippingError::InvalidDeliveryDays);
        }

        Ok(Self {
            id: ShippingMethodId::new(),
            name,
            description: description.into(),
            price,
            estimated_delivery_days,
            active: true,
        })
    }

    /// Replaces the method details, revalidating.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        estimated_delivery_days: u32,
    ) -> Result<(), ShippingError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ShippingError::MissingField { field: "name" });
        }
        if price.is_sign_negative() {
            return Err(ShippingError::NegativePrice { price });
        }
        if estimated_delivery_days == 0 {
            return Err(ShippingError::InvalidDeliveryDays);
        }

        self.name = name;
        self.description = description.into();
        self.price = price;
        self.estimated_delivery_days = estimated_delivery_days;
        Ok(())
    }

    /// Name with the delivery estimate appended, e.g. "Express (2 days)".
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.delivery_estimate())
    }

    /// Human-readable delivery estimate.
    pub fn delivery_estimate(&self) -> String {
        if self.estimated_delivery_days == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", self.estimated_delivery_days)
        }
    }
}
