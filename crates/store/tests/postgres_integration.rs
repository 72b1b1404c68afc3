//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::{CartId, ProductId, UserId};
use domain::{
    AddressFields, Cart, Checkout, CheckoutItem, CheckoutStatus, DeliveryOption, ShippingAddress,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use store::{
    CartStore, CheckoutStore, PostgresCartStore, PostgresCheckoutStore, PostgresShippingStore,
    ShippingStore, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            // Run migrations using raw_sql to execute multiple statements
            sqlx::raw_sql(include_str!(
                "../../../migrations/0001_create_shopping_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/0002_seed_shipping_methods.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh pool with cleared aggregate tables (shipping methods stay seeded)
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    // Create a fresh pool for each test to avoid connection issues
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE carts, checkouts, shipping_addresses")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn add_widget(cart: &mut Cart, price: Decimal, quantity: u32) {
    cart.add_item(ProductId::new(), "Widget", price, quantity, "")
        .unwrap();
}

fn sample_fields() -> AddressFields {
    AddressFields {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        street_address: "123 Main St".to_string(),
        apartment: String::new(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "USA".to_string(),
        phone_number: "+1-555-0100".to_string(),
        is_default: false,
    }
}

fn sample_checkout(user_id: UserId) -> Checkout {
    let items = vec![CheckoutItem::new(
        ProductId::new(),
        "Widget",
        Decimal::new(2999, 2),
        2,
        "",
    )];
    let subtotal = items.iter().map(|i| i.subtotal).sum();
    Checkout::new(CartId::new(), user_id, items, subtotal).unwrap()
}

#[tokio::test]
async fn cart_round_trips_through_postgres() {
    let store = PostgresCartStore::new(get_test_pool().await);
    let mut cart = Cart::new(UserId::new());
    add_widget(&mut cart, Decimal::new(1000, 2), 2);
    add_widget(&mut cart, Decimal::new(599, 2), 1);

    store.save(&mut cart).await.unwrap();
    assert_eq!(cart.version(), 1);

    let found = store.find_by_id(cart.id()).await.unwrap().unwrap();
    assert_eq!(found, cart);
    assert_eq!(found.subtotal(), Decimal::new(2599, 2));
}

#[tokio::test]
async fn cart_find_missing_returns_none() {
    let store = PostgresCartStore::new(get_test_pool().await);
    assert!(store.find_by_id(CartId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn cart_stale_save_is_rejected() {
    let store = PostgresCartStore::new(get_test_pool().await);
    let mut cart = Cart::new(UserId::new());
    store.save(&mut cart).await.unwrap();

    let mut stale = store.find_by_id(cart.id()).await.unwrap().unwrap();

    add_widget(&mut cart, Decimal::new(100, 2), 1);
    store.save(&mut cart).await.unwrap();
    assert_eq!(cart.version(), 2);

    add_widget(&mut stale, Decimal::new(200, 2), 1);
    let err = store.save(&mut stale).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::VersionConflict { entity: "cart", .. }
    ));
}

#[tokio::test]
async fn cart_find_by_user_returns_most_recently_updated() {
    let store = PostgresCartStore::new(get_test_pool().await);
    let user_id = UserId::new();

    let mut older = Cart::new(user_id);
    store.save(&mut older).await.unwrap();

    let mut newer = Cart::new(user_id);
    add_widget(&mut newer, Decimal::new(100, 2), 1);
    store.save(&mut newer).await.unwrap();

    let found = store.find_by_user_id(user_id).await.unwrap().unwrap();
    assert_eq!(found.id(), newer.id());
}

#[tokio::test]
async fn cart_delete_removes_row() {
    let store = PostgresCartStore::new(get_test_pool().await);
    let mut cart = Cart::new(UserId::new());
    store.save(&mut cart).await.unwrap();

    store.delete(cart.id()).await.unwrap();
    assert!(store.find_by_id(cart.id()).await.unwrap().is_none());

    // Deleting again is not an error
    store.delete(cart.id()).await.unwrap();
}

#[tokio::test]
async fn checkout_round_trips_with_value_objects() {
    let pool = get_test_pool().await;
    let store = PostgresCheckoutStore::new(pool.clone());
    let shipping = PostgresShippingStore::new(pool);

    let methods = shipping.find_all_methods().await.unwrap();
    let standard = &methods[0];

    let user_id = UserId::new();
    let mut address = ShippingAddress::new(user_id, sample_fields()).unwrap();
    address.is_default = true;
    shipping.save_address(&address).await.unwrap();

    let mut checkout = sample_checkout(user_id);
    checkout
        .set_delivery_option(
            DeliveryOption::new(address.id, standard.id),
            standard.price,
        )
        .unwrap();
    checkout.calculate_tax(Decimal::new(1, 1));
    let details: serde_json::Map<String, serde_json::Value> =
        serde_json::from_value(serde_json::json!({"last4": "4242"})).unwrap();
    checkout.set_payment_method("credit_card", details).unwrap();

    store.save(&mut checkout).await.unwrap();

    let found = store.find_by_id(checkout.id()).await.unwrap().unwrap();
    assert_eq!(found, checkout);
    assert_eq!(found.status(), CheckoutStatus::PaymentSelected);
    assert_eq!(found.delivery_option(), checkout.delivery_option());
    assert_eq!(found.payment_method(), checkout.payment_method());
}

#[tokio::test]
async fn checkout_stale_save_is_rejected() {
    let store = PostgresCheckoutStore::new(get_test_pool().await);
    let mut checkout = sample_checkout(UserId::new());
    store.save(&mut checkout).await.unwrap();

    let mut stale = store.find_by_id(checkout.id()).await.unwrap().unwrap();

    checkout.cancel();
    store.save(&mut checkout).await.unwrap();

    stale.cancel();
    let err = store.save(&mut stale).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::VersionConflict {
            entity: "checkout",
            ..
        }
    ));
}

#[tokio::test]
async fn checkout_status_survives_round_trip() {
    let store = PostgresCheckoutStore::new(get_test_pool().await);
    let mut checkout = sample_checkout(UserId::new());
    checkout.cancel();

    store.save(&mut checkout).await.unwrap();

    let found = store.find_by_id(checkout.id()).await.unwrap().unwrap();
    assert_eq!(found.status(), CheckoutStatus::Cancelled);
}

#[tokio::test]
async fn checkouts_by_user_are_newest_first_and_capped() {
    let store = PostgresCheckoutStore::new(get_test_pool().await);
    let user_id = UserId::new();

    for _ in 0..3 {
        let mut checkout = sample_checkout(user_id);
        store.save(&mut checkout).await.unwrap();
    }

    let found = store.find_by_user_id(user_id, 2).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found[0].created_at() >= found[1].created_at());
}

#[tokio::test]
async fn saving_default_address_clears_previous_default() {
    let store = PostgresShippingStore::new(get_test_pool().await);
    let user_id = UserId::new();

    let mut first = ShippingAddress::new(user_id, sample_fields()).unwrap();
    first.is_default = true;
    store.save_address(&first).await.unwrap();

    let mut second = ShippingAddress::new(user_id, sample_fields()).unwrap();
    second.is_default = true;
    store.save_address(&second).await.unwrap();

    let addresses = store.find_addresses_by_user_id(user_id).await.unwrap();
    assert_eq!(addresses.len(), 2);
    let defaults: Vec<_> = addresses.iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, second.id);

    // Default sorts first
    assert_eq!(addresses[0].id, second.id);
}

#[tokio::test]
async fn address_update_round_trips() {
    let store = PostgresShippingStore::new(get_test_pool().await);
    let user_id = UserId::new();

    let mut address = ShippingAddress::new(user_id, sample_fields()).unwrap();
    store.save_address(&address).await.unwrap();

    let mut fields = sample_fields();
    fields.city = "Shelbyville".to_string();
    fields.apartment = "Apt 4B".to_string();
    address.update(fields).unwrap();
    store.save_address(&address).await.unwrap();

    let found = store.find_address_by_id(address.id).await.unwrap().unwrap();
    assert_eq!(found.city, "Shelbyville");
    assert_eq!(found.apartment, "Apt 4B");
}

#[tokio::test]
async fn address_delete_removes_row() {
    let store = PostgresShippingStore::new(get_test_pool().await);
    let address = ShippingAddress::new(UserId::new(), sample_fields()).unwrap();
    store.save_address(&address).await.unwrap();

    store.delete_address(address.id).await.unwrap();
    assert!(
        store
            .find_address_by_id(address.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn seeded_methods_are_cheapest_first() {
    let store = PostgresShippingStore::new(get_test_pool().await);

    let methods = store.find_all_methods().await.unwrap();
    assert_eq!(methods.len(), 3);
    assert_eq!(methods[0].name, "Standard Shipping");
    assert_eq!(methods[0].price, Decimal::new(599, 2));
    assert_eq!(methods[1].name, "Express Shipping");
    assert_eq!(methods[2].name, "Same Day Delivery");
    assert!(methods.windows(2).all(|w| w[0].price <= w[1].price));

    let standard = store
        .find_method_by_id(methods[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(standard.estimated_delivery_days, 5);
    assert!(standard.active);
}
