//! Checkout endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{AddressId, CartId, CheckoutId, ShippingMethodId, UserId};
use domain::{Checkout, CheckoutItem, DeliveryOption, PaymentMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store::{CartStore, CheckoutStore, ShippingStore};

use crate::error::ApiError;
use crate::routes::{AppState, parse_uuid};

const DEFAULT_HISTORY_LIMIT: u32 = 20;

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateCheckoutRequest {
    pub cart_id: String,
    pub user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShippingRequest {
    pub user_id: String,
    pub shipping_address_id: String,
    pub shipping_method_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRequest {
    pub user_id: String,
    pub payment_type: String,
    pub payment_details: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub id: String,
    pub cart_id: String,
    pub user_id: String,
    pub status: String,
    pub items: Vec<CheckoutItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_option: Option<DeliveryOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Checkout> for CheckoutResponse {
    fn from(checkout: Checkout) -> Self {
        Self {
            id: checkout.id().to_string(),
            cart_id: checkout.cart_id().to_string(),
            user_id: checkout.user_id().to_string(),
            status: checkout.status().as_str().to_string(),
            subtotal: checkout.subtotal(),
            shipping_cost: checkout.shipping_cost(),
            tax: checkout.tax(),
            total: checkout.total(),
            delivery_option: checkout.delivery_option().copied(),
            payment_method: checkout.payment_method().cloned(),
            created_at: checkout.created_at().to_rfc3339(),
            updated_at: checkout.updated_at().to_rfc3339(),
            items: checkout.items().to_vec(),
        }
    }
}

// -- Handlers --

/// POST /api/checkout/init — open a checkout from a cart.
#[tracing::instrument(skip(state, req))]
pub async fn initiate<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Json(req): Json<InitiateCheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let cart_id = CartId::from_uuid(parse_uuid(&req.cart_id, "cart ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&req.user_id, "user ID")?);

    let checkout = state.checkouts.initiate_checkout(cart_id, user_id).await?;
    Ok((StatusCode::CREATED, Json(checkout.into())))
}

/// GET /api/checkout/:id?userId= — load a checkout.
#[tracing::instrument(skip(state))]
pub async fn get<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let checkout_id = CheckoutId::from_uuid(parse_uuid(&id, "checkout ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&query.user_id, "user ID")?);

    let checkout = state.checkouts.get_checkout(checkout_id, user_id).await?;
    Ok(Json(checkout.into()))
}

/// GET /api/checkout/cart/:cartId?userId= — the cart's most recent checkout.
#[tracing::instrument(skip(state))]
pub async fn get_by_cart<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(cart_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let cart_id = CartId::from_uuid(parse_uuid(&cart_id, "cart ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&query.user_id, "user ID")?);

    let checkout = state.checkouts.get_checkout_by_cart(cart_id, user_id).await?;
    Ok(Json(checkout.into()))
}

/// GET /api/checkout/user/:userId?limit= — the user's checkout history.
#[tracing::instrument(skip(state))]
pub async fn history<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<CheckoutResponse>>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let user_id = UserId::from_uuid(parse_uuid(&user_id, "user ID")?);
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    let checkouts = state.checkouts.get_checkouts(user_id, limit).await?;
    Ok(Json(checkouts.into_iter().map(Into::into).collect()))
}

/// PUT /api/checkout/:id/shipping — select shipping address and method.
#[tracing::instrument(skip(state, req))]
pub async fn update_shipping<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateShippingRequest>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let checkout_id = CheckoutId::from_uuid(parse_uuid(&id, "checkout ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&req.user_id, "user ID")?);
    let address_id = AddressId::from_uuid(parse_uuid(&req.shipping_address_id, "address ID")?);
    let method_id =
        ShippingMethodId::from_uuid(parse_uuid(&req.shipping_method_id, "method ID")?);

    let checkout = state
        .checkouts
        .update_shipping(checkout_id, user_id, address_id, method_id)
        .await?;
    Ok(Json(checkout.into()))
}

/// PUT /api/checkout/:id/payment-method — capture the payment method.
#[tracing::instrument(skip(state, req))]
pub async fn set_payment_method<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Json(req): Json<PaymentMethodRequest>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let checkout_id = CheckoutId::from_uuid(parse_uuid(&id, "checkout ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&req.user_id, "user ID")?);

    let checkout = state
        .checkouts
        .set_payment_method(checkout_id, user_id, req.payment_type, req.payment_details)
        .await?;
    Ok(Json(checkout.into()))
}

/// POST /api/checkout/:id/complete — complete the checkout.
#[tracing::instrument(skip(state, req))]
pub async fn complete<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let checkout_id = CheckoutId::from_uuid(parse_uuid(&id, "checkout ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&req.user_id, "user ID")?);

    let checkout = state
        .checkouts
        .complete_checkout(checkout_id, user_id)
        .await?;
    Ok(Json(checkout.into()))
}

/// POST /api/checkout/:id/cancel — cancel the checkout.
#[tracing::instrument(skip(state, req))]
pub async fn cancel<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Json(req): Json<UserRequest>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let checkout_id = CheckoutId::from_uuid(parse_uuid(&id, "checkout ID")?);
    let user_id = UserId::from_uuid(parse_uuid(&req.user_id, "user ID")?);

    let checkout = state
        .checkouts
        .cancel_checkout(checkout_id, user_id)
        .await?;
    Ok(Json(checkout.into()))
}
