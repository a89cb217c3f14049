//! Validate command implementation
//!
//! Runs the post-migration reconciliation battery against both stores
//! and prints the report. Read-only: nothing is written to either side.

use crate::adapters::bigcommerce::BigCommerceClient;
use crate::adapters::traits::{DestinationClient, SourceClient};
use crate::adapters::woocommerce::WooCommerceClient;
use crate::config::load_config;
use crate::core::validation::{CheckStatus, HttpProber, Validator, ValidatorConfig};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Override the number of products sampled
    #[arg(long)]
    pub sample_size: Option<u32>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting validate command");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let source: Arc<dyn SourceClient> =
            match WooCommerceClient::new(config.woocommerce.clone()) {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    eprintln!("Failed to initialize WooCommerce client: {e}");
                    return Ok(4);
                }
            };
        let destination: Arc<dyn DestinationClient> =
            match BigCommerceClient::new(config.bigcommerce.clone()) {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    eprintln!("Failed to initialize BigCommerce client: {e}");
                    return Ok(4);
                }
            };
        let prober =
            match HttpProber::new(Duration::from_secs(config.validation.probe_timeout_secs)) {
                Ok(prober) => Arc::new(prober),
                Err(e) => {
                    eprintln!("Failed to initialize image prober: {e}");
                    return Ok(4);
                }
            };

        let validator_config = ValidatorConfig {
            sample_size: self.sample_size.unwrap_or(config.validation.sample_size),
        };

        println!("🔍 Validating migration...");
        println!();

        let validator = Validator::new(source, destination, prober, validator_config);
        let report = validator.run().await;

        println!("{}", report.format_summary());

        match report.aggregate_status() {
            CheckStatus::Fail => Ok(3),
            _ => Ok(0),
        }
    }
}
