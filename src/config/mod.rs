//! Configuration management for Caravan.
//!
//! TOML-based configuration loading, parsing, and validation with support
//! for environment variable substitution (`${VAR_NAME}`), `CARAVAN_*`
//! overrides, defaults for optional settings and secret-protected
//! credentials.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [woocommerce]
//! base_url = "https://shop.example.com"
//! consumer_key = "${WC_CONSUMER_KEY}"
//! consumer_secret = "${WC_CONSUMER_SECRET}"
//!
//! [bigcommerce]
//! store_hash = "abc123"
//! access_token = "${BC_ACCESS_TOKEN}"
//!
//! [migration]
//! per_page = 50
//! request_delay_ms = 350
//! state_path = "caravan-state.json"
//!
//! [validation]
//! sample_size = 10
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BigCommerceConfig, CaravanConfig, MigrationConfig, ValidationConfig,
    WooCommerceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
