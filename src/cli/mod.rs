//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Caravan using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Caravan - WooCommerce to BigCommerce Migration Tool
#[derive(Parser, Debug)]
#[command(name = "caravan")]
#[command(version, about, long_about = None)]
#[command(author = "Caravan Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "caravan.toml", env = "CARAVAN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CARAVAN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate catalog and orders from WooCommerce to BigCommerce
    Migrate(commands::migrate::MigrateArgs),

    /// Reconcile the two stores after a migration
    Validate(commands::validate::ValidateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate_config::ValidateConfigArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_migrate() {
        let cli = Cli::parse_from(["caravan", "migrate"]);
        assert_eq!(cli.config, "caravan.toml");
        assert!(matches!(cli.command, Commands::Migrate(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["caravan", "--config", "custom.toml", "migrate"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["caravan", "--log-level", "debug", "validate"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::parse_from(["caravan", "validate"]);
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["caravan", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["caravan", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_migrate_skip_orders() {
        let cli = Cli::parse_from(["caravan", "migrate", "--skip-orders", "--yes"]);
        if let Commands::Migrate(args) = cli.command {
            assert!(args.skip_orders);
            assert!(!args.skip_customers);
            assert!(args.yes);
        } else {
            panic!("Expected migrate command");
        }
    }

    #[test]
    fn test_cli_parse_migrate_skip_customers() {
        let cli = Cli::parse_from(["caravan", "migrate", "--skip-customers", "--yes"]);
        if let Commands::Migrate(args) = cli.command {
            assert!(args.skip_customers);
            assert!(!args.skip_orders);
        } else {
            panic!("Expected migrate command");
        }
    }
}
