//! Checkout status state machine.

use serde::{Deserialize, Serialize};

/// The status of a checkout in its lifecycle.
///
/// Transitions:
/// ```text
/// Initiated ──► ShippingSelected ──► PaymentSelected ──► Completed
///     │               │                    │
///     └───────────────┴────────────────────┴──► Cancelled
/// ```
///
/// Shipping re-selection is allowed after payment selection and drops the
/// status back to `ShippingSelected`; cancelling a completed checkout is a
/// no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutStatus {
    /// Checkout created from a cart snapshot; nothing selected yet.
    #[default]
    Initiated,

    /// A delivery option has been chosen and shipping cost applied.
    ShippingSelected,

    /// A payment method has been captured.
    PaymentSelected,

    /// Checkout finished (terminal state).
    Completed,

    /// Checkout abandoned (terminal state).
    Cancelled,
}

impl CheckoutStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutStatus::Completed | CheckoutStatus::Cancelled)
    }

    /// Returns the status name in its external SCREAMING_SNAKE form.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStatus::Initiated => "INITIATED",
            CheckoutStatus::ShippingSelected => "SHIPPING_SELECTED",
            CheckoutStatus::PaymentSelected => "PAYMENT_SELECTED",
            CheckoutStatus::Completed => "COMPLETED",
            CheckoutStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
