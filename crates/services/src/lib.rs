//! Application services for the shopping-experience API.
//!
//! Each service orchestrates one aggregate over its persistence gateway:
//! carts, checkouts and shipping. Cross-aggregate reads go through narrow
//! collaborator traits (for example [`CartSnapshots`]) rather than the
//! other aggregate's gateway, keeping the seams mockable.

pub mod cart;
pub mod checkout;
pub mod error;
pub mod shipping;
pub mod snapshot;

pub use cart::CartService;
pub use checkout::CheckoutService;
pub use error::{Result, ServiceError};
pub use shipping::ShippingService;
pub use snapshot::{CartSnapshot, CartSnapshots, CartStoreSnapshots};
