//! Domain error types
//!
//! This module defines the error hierarchy for Caravan. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Caravan error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum CaravanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// WooCommerce (source platform) errors
    #[error("WooCommerce error: {0}")]
    WooCommerce(#[from] WooCommerceError),

    /// BigCommerce (destination platform) errors
    #[error("BigCommerce error: {0}")]
    BigCommerce(#[from] BigCommerceError),

    /// Migration process errors
    #[error("Migration error: {0}")]
    Migration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// State persistence errors
    #[error("State error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// WooCommerce-specific errors
///
/// Errors that occur when reading from the source platform. These errors
/// don't expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum WooCommerceError {
    /// Failed to connect to the WooCommerce store
    #[error("Failed to connect to WooCommerce store: {0}")]
    ConnectionFailed(String),

    /// Authentication failed (bad consumer key/secret)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from the store
    #[error("Invalid response from store: {0}")]
    InvalidResponse(String),

    /// Entity not found
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// BigCommerce-specific errors
///
/// Errors that occur when writing to the destination platform.
#[derive(Debug, Error)]
pub enum BigCommerceError {
    /// Failed to connect to the BigCommerce API
    #[error("Failed to connect to BigCommerce: {0}")]
    ConnectionFailed(String),

    /// Authentication failed (bad access token)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Create request was rejected
    #[error("Failed to create {entity}: {message}")]
    CreateFailed { entity: String, message: String },

    /// Failed to query the destination
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Rate limit hit (429)
    #[error("Rate limit exceeded, retry after: {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Failed to deserialize a response
    #[error("Failed to deserialize response: {0}")]
    DeserializationFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for CaravanError {
    fn from(err: std::io::Error) -> Self {
        CaravanError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CaravanError {
    fn from(err: serde_json::Error) -> Self {
        CaravanError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CaravanError {
    fn from(err: toml::de::Error) -> Self {
        CaravanError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caravan_error_display() {
        let err = CaravanError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_woocommerce_error_conversion() {
        let wc_err = WooCommerceError::ConnectionFailed("Network error".to_string());
        let err: CaravanError = wc_err.into();
        assert!(matches!(err, CaravanError::WooCommerce(_)));
    }

    #[test]
    fn test_bigcommerce_error_conversion() {
        let bc_err = BigCommerceError::RateLimited("30 seconds".to_string());
        let err: CaravanError = bc_err.into();
        assert!(matches!(err, CaravanError::BigCommerce(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: CaravanError = io_err.into();
        assert!(matches!(err, CaravanError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: CaravanError = json_err.into();
        assert!(matches!(err, CaravanError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: CaravanError = toml_err.into();
        assert!(matches!(err, CaravanError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = CaravanError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;

        let err = WooCommerceError::ConnectionFailed("Test error".to_string());
        let _: &dyn std::error::Error = &err;

        let err = BigCommerceError::QueryFailed("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
