//! Init command implementation
//!
//! Generates a sample configuration file to edit.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "caravan.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, SAMPLE_CONFIG) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your store settings", self.output);
                println!("  2. Export your credentials:");
                println!("     - WC_CONSUMER_KEY and WC_CONSUMER_SECRET");
                println!("     - BC_ACCESS_TOKEN");
                println!("  3. Validate configuration: caravan validate-config");
                println!("  4. Run migration: caravan migrate");
                println!("  5. Reconcile afterwards: caravan validate");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}

const SAMPLE_CONFIG: &str = r#"# Caravan Configuration File
# WooCommerce to BigCommerce migration tool

[application]
log_level = "info"

[woocommerce]
base_url = "https://shop.example.com"
consumer_key = "${WC_CONSUMER_KEY}"
consumer_secret = "${WC_CONSUMER_SECRET}"

[bigcommerce]
store_hash = "your-store-hash"
access_token = "${BC_ACCESS_TOKEN}"

[migration]
per_page = 50
max_pages = 500
request_delay_ms = 350
state_path = "caravan-state.json"

[validation]
sample_size = 10
probe_timeout_secs = 5
"#;
