//! Structured logging setup using tracing
//!
//! Console logging with a configurable level filter. The `RUST_LOG`
//! environment variable takes precedence over the configured level.
//!
//! # Example
//!
//! ```no_run
//! use caravan::logging::init_logging;
//!
//! init_logging("info").expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```

use crate::domain::{CaravanError, Result};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the logging system
///
/// # Errors
///
/// Returns an error if the log level is invalid or a global subscriber
/// is already installed.
pub fn init_logging(log_level_str: &str) -> Result<()> {
    let log_level = parse_log_level(log_level_str)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("caravan={log_level}")));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| CaravanError::Configuration(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

/// Parse a log level string into a tracing Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(CaravanError::Configuration(format!(
            "Invalid log level: {other}"
        ))),
    }
}
