//! Platform adapters
//!
//! Concrete HTTP clients for the two commerce platforms, behind the
//! traits the migration core consumes.

pub mod bigcommerce;
pub mod traits;
pub mod woocommerce;

pub use bigcommerce::BigCommerceClient;
pub use traits::{DestinationClient, ListPage, SourceClient};
pub use woocommerce::WooCommerceClient;
