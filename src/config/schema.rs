//! Configuration schema types

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Main Caravan configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaravanConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// WooCommerce source store configuration
    pub woocommerce: WooCommerceConfig,

    /// BigCommerce destination store configuration
    pub bigcommerce: BigCommerceConfig,

    /// Migration run settings
    #[serde(default)]
    pub migration: MigrationConfig,

    /// Post-migration validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl CaravanConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.woocommerce.validate()?;
        self.bigcommerce.validate()?;
        self.migration.validate()?;
        self.validation.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name used in logs
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    pub fn validate(&self) -> Result<(), String> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                LEVELS.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// WooCommerce REST API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WooCommerceConfig {
    /// Store base URL, e.g. `https://shop.example.com`
    pub base_url: String,

    /// REST API consumer key (`ck_...`)
    pub consumer_key: SecretString,

    /// REST API consumer secret (`cs_...`)
    pub consumer_secret: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl WooCommerceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("woocommerce.base_url is required".to_string());
        }
        Url::parse(&self.base_url)
            .map_err(|e| format!("woocommerce.base_url is not a valid URL: {e}"))?;
        if secrecy::ExposeSecret::expose_secret(&self.consumer_key).is_empty() {
            return Err("woocommerce.consumer_key is required".to_string());
        }
        if secrecy::ExposeSecret::expose_secret(&self.consumer_secret).is_empty() {
            return Err("woocommerce.consumer_secret is required".to_string());
        }
        Ok(())
    }
}

/// BigCommerce REST API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigCommerceConfig {
    /// Store hash identifying the store, e.g. `abc123`
    pub store_hash: String,

    /// API account access token
    pub access_token: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl BigCommerceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.store_hash.is_empty() {
            return Err("bigcommerce.store_hash is required".to_string());
        }
        if secrecy::ExposeSecret::expose_secret(&self.access_token).is_empty() {
            return Err("bigcommerce.access_token is required".to_string());
        }
        Ok(())
    }
}

/// Migration run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Source page size
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Safety cap on pages fetched per run
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Fixed delay between destination writes, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Path of the JSON state file carrying id maps between runs
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

impl MigrationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.per_page == 0 || self.per_page > 100 {
            return Err("migration.per_page must be between 1 and 100".to_string());
        }
        if self.max_pages == 0 {
            return Err("migration.max_pages must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            request_delay_ms: default_request_delay_ms(),
            state_path: default_state_path(),
        }
    }
}

/// Post-migration validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// How many destination products to sample for price and image checks
    #[serde(default = "default_sample_size")]
    pub sample_size: u32,

    /// Timeout for image reachability probes, in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_size == 0 {
            return Err("validation.sample_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

fn default_app_name() -> String {
    "caravan".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_per_page() -> u32 {
    50
}

fn default_max_pages() -> u32 {
    500
}

fn default_request_delay_ms() -> u64 {
    350
}

fn default_state_path() -> String {
    "caravan-state.json".to_string()
}

fn default_sample_size() -> u32 {
    10
}

fn default_probe_timeout_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn valid_config() -> CaravanConfig {
        CaravanConfig {
            application: ApplicationConfig::default(),
            woocommerce: WooCommerceConfig {
                base_url: "https://shop.example.com".to_string(),
                consumer_key: secret_string("ck_abc".to_string()),
                consumer_secret: secret_string("cs_def".to_string()),
                timeout_seconds: 30,
            },
            bigcommerce: BigCommerceConfig {
                store_hash: "abc123".to_string(),
                access_token: secret_string("token".to_string()),
                timeout_seconds: 30,
            },
            migration: MigrationConfig::default(),
            validation: ValidationConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = valid_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("log_level"));
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        let mut config = valid_config();
        config.woocommerce.base_url = "not a url".to_string();
        assert!(config.validate().unwrap_err().contains("base_url"));
    }

    #[test]
    fn test_empty_access_token_rejected() {
        let mut config = valid_config();
        config.bigcommerce.access_token = secret_string(String::new());
        assert!(config.validate().unwrap_err().contains("access_token"));
    }

    #[test]
    fn test_per_page_bounds() {
        let mut config = valid_config();
        config.migration.per_page = 0;
        assert!(config.validate().is_err());

        config.migration.per_page = 101;
        assert!(config.validate().is_err());

        config.migration.per_page = 100;
        assert!(config.validate().is_ok());
    }
}
