//! Shipping address and method endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{AddressId, UserId};
use domain::{AddressFields, ShippingAddress, ShippingMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store::{CartStore, CheckoutStore, ShippingStore};

use crate::error::ApiError;
use crate::routes::{AppState, parse_uuid};

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    #[serde(default)]
    pub apartment: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressRequest {
    fn into_parts(self) -> Result<(UserId, AddressFields), ApiError> {
        let user_id = UserId::from_uuid(parse_uuid(&self.user_id, "user ID")?);
        let fields = AddressFields {
            first_name: self.first_name,
            last_name: self.last_name,
            street_address: self.street_address,
            apartment: self.apartment,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            phone_number: self.phone_number,
            is_default: self.is_default,
        };
        Ok((user_id, fields))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub estimated_delivery_days: u32,
    pub display_name: String,
    pub delivery_estimate: String,
}

impl From<ShippingMethod> for MethodResponse {
    fn from(method: ShippingMethod) -> Self {
        Self {
            id: method.id.to_string(),
            display_name: method.display_name(),
            delivery_estimate: method.delivery_estimate(),
            name: method.name,
            description: method.description,
            price: method.price,
            estimated_delivery_days: method.estimated_delivery_days,
        }
    }
}

// -- Handlers --

/// POST /api/shipping/addresses — create a shipping address.
#[tracing::instrument(skip(state, req))]
pub async fn create_address<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Json(req): Json<AddressRequest>,
) -> Result<(StatusCode, Json<ShippingAddress>), ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let (user_id, fields) = req.into_parts()?;
    let address = state.shipping.add_address(user_id, fields).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// GET /api/shipping/addresses/:id?userId= — load an address.
#[tracing::instrument(skip(state))]
pub async fn get_address<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ShippingAddress>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let address_id = AddressId::from_uuid(parse_uuid(&id, "address ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&query.user_id, "user ID")?);

    let address = state.shipping.get_address(address_id, user_id).await?;
    Ok(Json(address))
}

/// GET /api/shipping/addresses/user/:userId — list a user's addresses.
#[tracing::instrument(skip(state))]
pub async fn list_addresses<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ShippingAddress>>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let user_id = UserId::from_uuid(parse_uuid(&user_id, "user ID")?);
    let addresses = state.shipping.get_addresses(user_id).await?;
    Ok(Json(addresses))
}

/// PUT /api/shipping/addresses/:id — replace an address's details.
#[tracing::instrument(skip(state, req))]
pub async fn update_address<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Json(req): Json<AddressRequest>,
) -> Result<Json<ShippingAddress>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let address_id = AddressId::from_uuid(parse_uuid(&id, "address ID")?);
    let (user_id, fields) = req.into_parts()?;

    let address = state
        .shipping
        .update_address(address_id, user_id, fields)
        .await?;
    Ok(Json(address))
}

/// DELETE /api/shipping/addresses/:id?userId= — delete an address.
#[tracing::instrument(skip(state))]
pub async fn delete_address<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let address_id = AddressId::from_uuid(parse_uuid(&id, "address ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&query.user_id, "user ID")?);

    state.shipping.delete_address(address_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/shipping/methods — list active shipping methods, cheapest first.
#[tracing::instrument(skip(state))]
pub async fn list_methods<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
) -> Result<Json<Vec<MethodResponse>>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let methods = state.shipping.get_methods().await?;
    Ok(Json(methods.into_iter().map(Into::into).collect()))
}
