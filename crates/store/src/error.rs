use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the persistence gateways.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The aggregate was modified by another writer between load and save.
    #[error("version conflict saving {entity} {id}: concurrent update detected")]
    VersionConflict { entity: &'static str, id: Uuid },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
