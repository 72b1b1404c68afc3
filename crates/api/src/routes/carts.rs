//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{CartId, CartItemId, ProductId, UserId};
use domain::{Cart, CartItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store::{CartStore, CheckoutStore, ShippingStore};

use crate::error::ApiError;
use crate::routes::{AppState, parse_uuid};

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub subtotal: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id().to_string(),
            user_id: cart.user_id().to_string(),
            total_items: cart.total_items(),
            subtotal: cart.subtotal(),
            created_at: cart.created_at().to_rfc3339(),
            updated_at: cart.updated_at().to_rfc3339(),
            items: cart.items().to_vec(),
        }
    }
}

// -- Handlers --

/// GET /api/carts/user/:userId — the user's cart, created on first access.
#[tracing::instrument(skip(state))]
pub async fn get_user_cart<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(user_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let user_id = UserId::from_uuid(parse_uuid(&user_id, "user ID")?);
    let cart = state.carts.get_or_create_cart(user_id).await?;
    Ok(Json(cart.into()))
}

/// GET /api/carts/:id — load a cart by ID.
#[tracing::instrument(skip(state))]
pub async fn get<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
) -> Result<Json<CartResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let cart_id = CartId::from_uuid(parse_uuid(&id, "cart ID")?);
    let cart = state.carts.get_cart(cart_id).await?;
    Ok(Json(cart.into()))
}

/// POST /api/carts/:id/items — add a product to the cart.
#[tracing::instrument(skip(state, req))]
pub async fn add_item<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartResponse>), ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let cart_id = CartId::from_uuid(parse_uuid(&id, "cart ID")?);
    let product_id = ProductId::from_uuid(parse_uuid(&req.product_id, "product ID")?);

    let cart = state
        .carts
        .add_item(
            cart_id,
            product_id,
            req.name,
            req.price,
            req.quantity,
            req.image_url,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(cart.into())))
}

/// PUT /api/carts/:id/items/:itemId — replace a line's quantity.
#[tracing::instrument(skip(state, req))]
pub async fn update_item<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path((id, item_id)): Path<(String, String)>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<CartResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let cart_id = CartId::from_uuid(parse_uuid(&id, "cart ID")?);
    let item_id = CartItemId::from_uuid(parse_uuid(&item_id, "item ID")?);

    let cart = state
        .carts
        .update_item_quantity(cart_id, item_id, req.quantity)
        .await?;
    Ok(Json(cart.into()))
}

/// DELETE /api/carts/:id/items/:itemId — remove a line from the cart.
#[tracing::instrument(skip(state))]
pub async fn remove_item<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let cart_id = CartId::from_uuid(parse_uuid(&id, "cart ID")?);
    let item_id = CartItemId::from_uuid(parse_uuid(&item_id, "item ID")?);

    let cart = state.carts.remove_item(cart_id, item_id).await?;
    Ok(Json(cart.into()))
}

/// DELETE /api/carts/:id/items — empty the cart.
#[tracing::instrument(skip(state))]
pub async fn clear<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
) -> Result<Json<CartResponse>, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let cart_id = CartId::from_uuid(parse_uuid(&id, "cart ID")?);
    let cart = state.carts.clear_cart(cart_id).await?;
    Ok(Json(cart.into()))
}

/// DELETE /api/carts/:id — delete the cart entirely.
#[tracing::instrument(skip(state))]
pub async fn delete<C, K, S>(
    State(state): State<Arc<AppState<C, K, S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let cart_id = CartId::from_uuid(parse_uuid(&id, "cart ID")?);
    state.carts.delete_cart(cart_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
