//! Validate-config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateConfigArgs {}

impl ValidateConfigArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config = %config_path, "Validating configuration");

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid: {config_path}");
                println!("  Source: {}", config.woocommerce.base_url);
                println!("  Destination store: {}", config.bigcommerce.store_hash);
                println!("  State file: {}", config.migration.state_path);
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration is invalid: {config_path}");
                println!("   {e}");
                Ok(2)
            }
        }
    }
}
