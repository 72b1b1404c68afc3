//! Service error types.

use domain::{CartError, CheckoutError, CheckoutStatus, ShippingError};
use store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A request failed domain validation.
    #[error("{0}")]
    Validation(String),

    /// The requested entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// The caller does not own the entity they are acting on.
    #[error("{entity} does not belong to the requesting user")]
    Forbidden { entity: &'static str },

    /// The checkout is not in a state that permits the requested action.
    #[error("cannot {action} a checkout in {status} state")]
    InvalidState {
        status: CheckoutStatus,
        action: &'static str,
    },

    /// Persistence error, including lost optimistic-concurrency races.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CartError> for ServiceError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotFound { item_id } => ServiceError::NotFound {
                entity: "cart item",
                id: item_id.as_uuid(),
            },
            other => ServiceError::Validation(other.to_string()),
        }
    }
}

impl From<ShippingError> for ServiceError {
    fn from(err: ShippingError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<CheckoutError> for ServiceError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InvalidState { status, action } => {
                ServiceError::InvalidState { status, action }
            }
            other => ServiceError::Validation(other.to_string()),
        }
    }
}

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;
