//! Configuration loader with TOML parsing and environment variable substitution

use super::schema::CaravanConfig;
use crate::domain::errors::CaravanError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CaravanConfig`]
/// 4. Applies environment variable overrides (`CARAVAN_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is unset, TOML parsing fails or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<CaravanConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CaravanError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CaravanError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CaravanConfig = toml::from_str(&contents)
        .map_err(|e| CaravanError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| CaravanError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CaravanError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line; references inside comments (whole-line or
    // trailing) are left untouched.
    for line in input.lines() {
        let (code, comment) = match comment_start(line) {
            Some(idx) => line.split_at(idx),
            None => (line, ""),
        };

        let mut processed = code.to_string();
        for cap in re.captures_iter(code) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed = processed.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed);
        result.push_str(comment);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CaravanError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Byte offset where a TOML comment starts on this line, if any
///
/// A `#` inside a quoted string is not a comment.
fn comment_start(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quote == Some('"') => escaped = true,
            '"' | '\'' => match quote {
                None => quote = Some(c),
                Some(open) if open == c => quote = None,
                Some(_) => {}
            },
            '#' if quote.is_none() => return Some(i),
            _ => {}
        }
    }
    None
}

/// Applies environment variable overrides using the `CARAVAN_*` prefix
///
/// Variables follow the pattern `CARAVAN_<SECTION>_<KEY>`, for example
/// `CARAVAN_WOOCOMMERCE_BASE_URL` or `CARAVAN_MIGRATION_PER_PAGE`.
fn apply_env_overrides(config: &mut CaravanConfig) {
    if let Ok(val) = std::env::var("CARAVAN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CARAVAN_WOOCOMMERCE_BASE_URL") {
        config.woocommerce.base_url = val;
    }
    if let Ok(val) = std::env::var("CARAVAN_WOOCOMMERCE_CONSUMER_KEY") {
        config.woocommerce.consumer_key = super::secret_string(val);
    }
    if let Ok(val) = std::env::var("CARAVAN_WOOCOMMERCE_CONSUMER_SECRET") {
        config.woocommerce.consumer_secret = super::secret_string(val);
    }

    if let Ok(val) = std::env::var("CARAVAN_BIGCOMMERCE_STORE_HASH") {
        config.bigcommerce.store_hash = val;
    }
    if let Ok(val) = std::env::var("CARAVAN_BIGCOMMERCE_ACCESS_TOKEN") {
        config.bigcommerce.access_token = super::secret_string(val);
    }

    if let Ok(val) = std::env::var("CARAVAN_MIGRATION_PER_PAGE") {
        if let Ok(per_page) = val.parse() {
            config.migration.per_page = per_page;
        }
    }
    if let Ok(val) = std::env::var("CARAVAN_MIGRATION_REQUEST_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.migration.request_delay_ms = delay;
        }
    }
    if let Ok(val) = std::env::var("CARAVAN_MIGRATION_STATE_PATH") {
        config.migration.state_path = val;
    }
}
