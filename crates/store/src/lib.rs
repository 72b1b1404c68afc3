//! Persistence gateways for the shopping-experience service.
//!
//! Each aggregate has a store trait with a PostgreSQL implementation for
//! production and an in-memory implementation for tests and local runs.
//! Aggregates are the unit of persistence: item collections and value
//! objects are serialized as JSONB blobs next to the scalar columns.
//!
//! Cart and checkout saves are compare-and-swap upserts keyed on the
//! aggregate's version; a lost race surfaces as [`StoreError::VersionConflict`]
//! instead of silently overwriting the other writer.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::{Result, StoreError};
pub use memory::{InMemoryCartStore, InMemoryCheckoutStore, InMemoryShippingStore};
pub use postgres::{
    PostgresCartStore, PostgresCheckoutStore, PostgresShippingStore, run_migrations,
};
pub use store::{CartStore, CheckoutStore, ShippingStore};
