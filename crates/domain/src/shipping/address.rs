use chrono::{DateTime, Utc};
use common::{AddressId, UserId};
use serde::{Deserialize, Serialize};

use super::ShippingError;

/// A user's shipping address.
///
/// All postal fields are required except `apartment`. At most one address per
/// user carries the default flag; the shipping gateway enforces that when a
/// default address is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub id: AddressId,
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    pub apartment: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The field set shared by creation and update.
pub struct AddressFields {
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    pub apartment: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
    pub is_default: bool,
}

impl AddressFields {
    fn validate(&self) -> Result<(), ShippingError> {
        let required: [(&'static str, &str); 8] = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("street address", &self.street_address),
            ("city", &self.city),
            ("state", &self.state),
            ("postal code", &self.postal_code),
            ("country", &self.country),
            ("phone number", &self.phone_number),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ShippingError::MissingField { field });
            }
        }
        Ok(())
    }
}

impl ShippingAddress {
    /// Creates a new shipping address, validating all required fields.
    pub fn new(user_id: UserId, fields: AddressFields) -> Result<Self, ShippingError> {
        if user_id.as_uuid().is_nil() {
            return Err(ShippingError::MissingField { field: "user ID" });
        }
        fields.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: AddressId::new(),
            user_id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            street_address: fields.street_address,
            apartment: fields.apartment,
            city: fields.city,
            state: fields.state,
            postal_code: fields.postal_code,
            country: fields.country,
            phone_number: fields.phone_number,
            is_default: fields.is_default,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the address details, revalidating required fields.
    pub fn update(&mut self, fields: AddressFields) -> Result<(), ShippingError> {
        fields.validate()?;

        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.street_address = fields.street_address;
        self.apartment = fields.apartment;
        self.city = fields.city;
        self.state = fields.state;
        self.postal_code = fields.postal_code;
        self.country = fields.country;
        self.phone_number = fields.phone_number;
        self.is_default = fields.is_default;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Recipient's full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Single-line postal rendering, apartment included when present.
    pub fn formatted_address(&self) -> String {
        let apartment = if self.apartment.is_empty() {
            String::new()
        } else {
            format!(", {}", self.apartment)
        };
        format!(
            "{}{}, {}, {} {}, {}",
            self.street_address, apartment, self.city, self.state, self.postal_code, self.country
        )
    }
}
