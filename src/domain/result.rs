//! Result type alias for Caravan
//!
//! This module provides a convenient Result type alias that uses
//! CaravanError as the error type.

use super::errors::CaravanError;

/// Result type alias for Caravan operations
///
/// This is a convenience type alias that uses `CaravanError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use caravan::domain::result::Result;
/// use caravan::domain::errors::CaravanError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CaravanError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CaravanError>;
