//! HTTP API server with observability for the shopping-experience service.
//!
//! Provides REST endpoints for carts, checkouts and shipping, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use services::{CartService, CartStoreSnapshots, CheckoutService, ShippingService};
use sqlx::PgPool;
use store::{
    CartStore, CheckoutStore, InMemoryCartStore, InMemoryCheckoutStore, InMemoryShippingStore,
    PostgresCartStore, PostgresCheckoutStore, PostgresShippingStore, ShippingStore,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, K, S>(state: Arc<AppState<C, K, S>>, metrics_handle: PrometheusHandle) -> Router
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/api/health", get(routes::health::check))
        .route(
            "/api/carts/user/{userId}",
            get(routes::carts::get_user_cart::<C, K, S>),
        )
        .route(
            "/api/carts/{id}",
            get(routes::carts::get::<C, K, S>).delete(routes::carts::delete::<C, K, S>),
        )
        .route(
            "/api/carts/{id}/items",
            post(routes::carts::add_item::<C, K, S>).delete(routes::carts::clear::<C, K, S>),
        )
        .route(
            "/api/carts/{id}/items/{itemId}",
            put(routes::carts::update_item::<C, K, S>)
                .delete(routes::carts::remove_item::<C, K, S>),
        )
        .route("/api/checkout/init", post(routes::checkout::initiate::<C, K, S>))
        .route(
            "/api/checkout/user/{userId}",
            get(routes::checkout::history::<C, K, S>),
        )
        .route(
            "/api/checkout/cart/{cartId}",
            get(routes::checkout::get_by_cart::<C, K, S>),
        )
        .route("/api/checkout/{id}", get(routes::checkout::get::<C, K, S>))
        .route(
            "/api/checkout/{id}/shipping",
            put(routes::checkout::update_shipping::<C, K, S>),
        )
        .route(
            "/api/checkout/{id}/payment-method",
            put(routes::checkout::set_payment_method::<C, K, S>),
        )
        .route(
            "/api/checkout/{id}/complete",
            post(routes::checkout::complete::<C, K, S>),
        )
        .route(
            "/api/checkout/{id}/cancel",
            post(routes::checkout::cancel::<C, K, S>),
        )
        .route(
            "/api/shipping/addresses",
            post(routes::shipping::create_address::<C, K, S>),
        )
        .route(
            "/api/shipping/addresses/user/{userId}",
            get(routes::shipping::list_addresses::<C, K, S>),
        )
        .route(
            "/api/shipping/addresses/{id}",
            get(routes::shipping::get_address::<C, K, S>)
                .put(routes::shipping::update_address::<C, K, S>)
                .delete(routes::shipping::delete_address::<C, K, S>),
        )
        .route(
            "/api/shipping/methods",
            get(routes::shipping::list_methods::<C, K, S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

fn build_state<C, K, S>(
    carts: Arc<C>,
    checkouts: Arc<K>,
    shipping: Arc<S>,
) -> Arc<AppState<C, K, S>>
where
    C: CartStore + 'static,
    K: CheckoutStore + 'static,
    S: ShippingStore + 'static,
{
    Arc::new(AppState {
        carts: CartService::new(carts.clone()),
        checkouts: CheckoutService::new(
            checkouts,
            CartStoreSnapshots::new(carts),
            shipping.clone(),
        ),
        shipping: ShippingService::new(shipping),
    })
}

/// Creates application state backed by PostgreSQL stores.
pub fn create_postgres_state(
    pool: PgPool,
) -> Arc<AppState<PostgresCartStore, PostgresCheckoutStore, PostgresShippingStore>> {
    build_state(
        Arc::new(PostgresCartStore::new(pool.clone())),
        Arc::new(PostgresCheckoutStore::new(pool.clone())),
        Arc::new(PostgresShippingStore::new(pool)),
    )
}

/// Creates application state backed by in-memory stores, with the standard
/// shipping method catalog seeded.
pub async fn create_default_state()
-> Arc<AppState<InMemoryCartStore, InMemoryCheckoutStore, InMemoryShippingStore>> {
    use domain::ShippingMethod;

    let shipping = Arc::new(InMemoryShippingStore::new());
    let catalog = [
        ("Standard Shipping", "Delivery in 5-7 business days", Decimal::new(599, 2), 5),
        ("Express Shipping", "Delivery in 1-2 business days", Decimal::new(1299, 2), 2),
        (
            "Same Day Delivery",
            "Delivery today for orders placed before 2 PM",
            Decimal::new(1999, 2),
            1,
        ),
    ];
    for (name, description, price, days) in catalog {
        let method = ShippingMethod::new(name, description, price, days)
            .expect("static shipping catalog is valid");
        shipping.insert_method(method).await;
    }

    build_state(
        Arc::new(InMemoryCartStore::new()),
        Arc::new(InMemoryCheckoutStore::new()),
        shipping,
    )
}
