use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{AddressId, CartId, CheckoutId, ShippingMethodId, UserId};
use domain::{
    Cart, CartItem, Checkout, CheckoutItem, CheckoutStatus, DeliveryOption, PaymentMethod,
    ShippingAddress, ShippingMethod,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Result, StoreError,
    store::{CartStore, CheckoutStore, ShippingStore},
};

/// Runs the database migrations.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

fn parse_status(raw: String) -> Result<CheckoutStatus> {
    Ok(serde_json::from_value(serde_json::Value::String(raw))?)
}

fn row_to_cart(row: &PgRow) -> Result<Cart> {
    let items: Vec<CartItem> = serde_json::from_value(row.try_get("items")?)?;
    Ok(Cart::restore(
        CartId::from_uuid(row.try_get::<Uuid, _>("id")?),
        UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
        items,
        row.try_get::<DateTime<Utc>, _>("created_at")?,
        row.try_get::<DateTime<Utc>, _>("updated_at")?,
        row.try_get::<i64, _>("version")?,
    ))
}

fn row_to_checkout(row: &PgRow) -> Result<Checkout> {
    let items: Vec<CheckoutItem> = serde_json::from_value(row.try_get("items")?)?;
    let delivery_option: Option<DeliveryOption> = row
        .try_get::<Option<serde_json::Value>, _>("delivery_option")?
        .map(serde_json::from_value)
        .transpose()?;
    let payment_method: Option<PaymentMethod> = row
        .try_get::<Option<serde_json::Value>, _>("payment_method")?
        .map(serde_json::from_value)
        .transpose()?;

    Ok(Checkout::restore(
        CheckoutId::from_uuid(row.try_get::<Uuid, _>("id")?),
        CartId::from_uuid(row.try_get::<Uuid, _>("cart_id")?),
        UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
        parse_status(row.try_get("status")?)?,
        items,
        row.try_get::<Decimal, _>("subtotal")?,
        row.try_get::<Decimal, _>("shipping_cost")?,
        row.try_get::<Decimal, _>("tax")?,
        row.try_get::<Decimal, _>("total")?,
        delivery_option,
        payment_method,
        row.try_get::<DateTime<Utc>, _>("created_at")?,
        row.try_get::<DateTime<Utc>, _>("updated_at")?,
        row.try_get::<i64, _>("version")?,
    ))
}

fn row_to_address(row: &PgRow) -> Result<ShippingAddress> {
    Ok(ShippingAddress {
        id: AddressId::from_uuid(row.try_get::<Uuid, _>("id")?),
        user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        street_address: row.try_get("street_address")?,
        apartment: row.try_get("apartment")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        postal_code: row.try_get("postal_code")?,
        country: row.try_get("country")?,
        phone_number: row.try_get("phone_number")?,
        is_default: row.try_get("is_default")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn row_to_method(row: &PgRow) -> Result<ShippingMethod> {
    Ok(ShippingMethod {
        id: ShippingMethodId::from_uuid(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get::<Decimal, _>("price")?,
        estimated_delivery_days: row.try_get::<i32, _>("estimated_delivery_days")? as u32,
        active: row.try_get("active")?,
    })
}

/// PostgreSQL-backed cart gateway.
#[derive(Clone)]
pub struct PostgresCartStore {
    pool: PgPool,
}

impl PostgresCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const CART_COLUMNS: &str = "id, user_id, items, created_at, updated_at, version";

#[async_trait]
impl CartStore for PostgresCartStore {
    async fn find_by_id(&self, id: CartId) -> Result<Option<Cart>> {
        let row = sqlx::query(&format!("SELECT {CART_COLUMNS} FROM carts WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_cart).transpose()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Cart>> {
        let row = sqlx::query(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_cart).transpose()
    }

    async fn save(&self, cart: &mut Cart) -> Result<()> {
        let items = serde_json::to_value(cart.items())?;
        let loaded_version = cart.version();
        let new_version = loaded_version + 1;

        let rows_affected = if loaded_version == 0 {
            sqlx::query(
                r#"
                INSERT INTO carts (id, user_id, items, created_at, updated_at, version)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(cart.id().as_uuid())
            .bind(cart.user_id().as_uuid())
            .bind(&items)
            .bind(cart.created_at())
            .bind(cart.updated_at())
            .bind(new_version)
            .execute(&self.pool)
            .await?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE carts
                SET items = $1, updated_at = $2, version = $3
                WHERE id = $4 AND version = $5
                "#,
            )
            .bind(&items)
            .bind(cart.updated_at())
            .bind(new_version)
            .bind(cart.id().as_uuid())
            .bind(loaded_version)
            .execute(&self.pool)
            .await?
            .rows_affected()
        };

        if rows_affected == 0 {
            return Err(StoreError::VersionConflict {
                entity: "cart",
                id: cart.id().as_uuid(),
            });
        }

        cart.set_version(new_version);
        Ok(())
    }

    async fn delete(&self, id: CartId) -> Result<()> {
        sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// PostgreSQL-backed checkout gateway.
#[derive(Clone)]
pub struct PostgresCheckoutStore {
    pool: PgPool,
}

impl PostgresCheckoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const CHECKOUT_COLUMNS: &str = "id, cart_id, user_id, status, items, subtotal, shipping_cost, \
                                tax, total, delivery_option, payment_method, created_at, \
                                updated_at, version";

#[async_trait]
impl CheckoutStore for PostgresCheckoutStore {
    async fn find_by_id(&self, id: CheckoutId) -> Result<Option<Checkout>> {
        let row = sqlx::query(&format!(
            "SELECT {CHECKOUT_COLUMNS} FROM checkouts WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_checkout).transpose()
    }

    async fn find_by_cart_id(&self, cart_id: CartId) -> Result<Option<Checkout>> {
        let row = sqlx::query(&format!(
            "SELECT {CHECKOUT_COLUMNS} FROM checkouts WHERE cart_id = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(cart_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_checkout).transpose()
    }

    async fn find_by_user_id(&self, user_id: UserId, limit: u32) -> Result<Vec<Checkout>> {
        let rows = sqlx::query(&format!(
            "SELECT {CHECKOUT_COLUMNS} FROM checkouts WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_checkout).collect()
    }

    async fn save(&self, checkout: &mut Checkout) -> Result<()> {
        let items = serde_json::to_value(checkout.items())?;
        let delivery_option = checkout
            .delivery_option()
            .map(serde_json::to_value)
            .transpose()?;
        let payment_method = checkout
            .payment_method()
            .map(serde_json::to_value)
            .transpose()?;
        let loaded_version = checkout.version();
        let new_version = loaded_version + 1;

        let rows_affected = if loaded_version == 0 {
            sqlx::query(
                r#"
                INSERT INTO checkouts
                    (id, cart_id, user_id, status, items, subtotal, shipping_cost, tax, total,
                     delivery_option, payment_method, created_at, updated_at, version)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(checkout.id().as_uuid())
            .bind(checkout.cart_id().as_uuid())
            .bind(checkout.user_id().as_uuid())
            .bind(checkout.status().as_str())
            .bind(&items)
            .bind(checkout.subtotal())
            .bind(checkout.shipping_cost())
            .bind(checkout.tax())
            .bind(checkout.total())
            .bind(&delivery_option)
            .bind(&payment_method)
            .bind(checkout.created_at())
            .bind(checkout.updated_at())
            .bind(new_version)
            .execute(&self.pool)
            .await?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE checkouts
                SET status = $1, shipping_cost = $2, tax = $3, total = $4,
                    delivery_option = $5, payment_method = $6, updated_at = $7, version = $8
                WHERE id = $9 AND version = $10
                "#,
            )
            .bind(checkout.status().as_str())
            .bind(checkout.shipping_cost())
            .bind(checkout.tax())
            .bind(checkout.total())
            .bind(&delivery_option)
            .bind(&payment_method)
            .bind(checkout.updated_at())
            .bind(new_version)
            .bind(checkout.id().as_uuid())
            .bind(loaded_version)
            .execute(&self.pool)
            .await?
            .rows_affected()
        };

        if rows_affected == 0 {
            return Err(StoreError::VersionConflict {
                entity: "checkout",
                id: checkout.id().as_uuid(),
            });
        }

        checkout.set_version(new_version);
        Ok(())
    }
}

/// PostgreSQL-backed shipping gateway.
#[derive(Clone)]
pub struct PostgresShippingStore {
    pool: PgPool,
}

impl PostgresShippingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const ADDRESS_COLUMNS: &str = "id, user_id, first_name, last_name, street_address, apartment, \
                               city, state, postal_code, country, phone_number, is_default, \
                               created_at, updated_at";

const METHOD_COLUMNS: &str = "id, name, description, price, estimated_delivery_days, active";

#[async_trait]
impl ShippingStore for PostgresShippingStore {
    async fn find_address_by_id(&self, id: AddressId) -> Result<Option<ShippingAddress>> {
        let row = sqlx::query(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM shipping_addresses WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_address).transpose()
    }

    async fn find_addresses_by_user_id(&self, user_id: UserId) -> Result<Vec<ShippingAddress>> {
        let rows = sqlx::query(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM shipping_addresses WHERE user_id = $1 \
             ORDER BY is_default DESC, created_at DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_address).collect()
    }

    async fn save_address(&self, address: &ShippingAddress) -> Result<()> {
        // Clearing other defaults and writing the new row share one
        // transaction, so two concurrent default saves cannot both survive
        // with the flag set.
        let mut tx = self.pool.begin().await?;

        if address.is_default {
            sqlx::query(
                "UPDATE shipping_addresses SET is_default = FALSE, updated_at = NOW() \
                 WHERE user_id = $1 AND id <> $2 AND is_default",
            )
            .bind(address.user_id.as_uuid())
            .bind(address.id.as_uuid())
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO shipping_addresses
                (id, user_id, first_name, last_name, street_address, apartment, city, state,
                 postal_code, country, phone_number, is_default, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                street_address = EXCLUDED.street_address,
                apartment = EXCLUDED.apartment,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                postal_code = EXCLUDED.postal_code,
                country = EXCLUDED.country,
                phone_number = EXCLUDED.phone_number,
                is_default = EXCLUDED.is_default,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(address.id.as_uuid())
        .bind(address.user_id.as_uuid())
        .bind(&address.first_name)
        .bind(&address.last_name)
        .bind(&address.street_address)
        .bind(&address.apartment)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.postal_code)
        .bind(&address.country)
        .bind(&address.phone_number)
        .bind(address.is_default)
        .bind(address.created_at)
        .bind(address.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_address(&self, id: AddressId) -> Result<()> {
        sqlx::query("DELETE FROM shipping_addresses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_method_by_id(&self, id: ShippingMethodId) -> Result<Option<ShippingMethod>> {
        let row = sqlx::query(&format!(
            "SELECT {METHOD_COLUMNS} FROM shipping_methods WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_method).transpose()
    }

    async fn find_all_methods(&self) -> Result<Vec<ShippingMethod>> {
        let rows = sqlx::query(&format!(
            "SELECT {METHOD_COLUMNS} FROM shipping_methods WHERE active ORDER BY price ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_method).collect()
    }
}
