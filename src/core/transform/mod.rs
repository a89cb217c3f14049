//! Record transformation logic
//!
//! This module converts source-platform records into destination-shaped
//! records while enforcing the destination's invariants. The transformers
//! are pure and deterministic: they touch no network and carry no state,
//! which is what makes the migration runner's behavior reproducible under
//! re-runs.
//!
//! - [`catalog`] - products (simple and variable) and batch partitioning
//! - [`variants`] - option definitions, value-index maps and variants
//! - [`customers`] - customer accounts
//! - [`orders`] - orders, addresses, line items and refund notes

pub mod catalog;
pub mod customers;
pub mod orders;
pub mod variants;

/// Parses a decimal money/weight string from the source platform
///
/// The source API serializes all monetary amounts and weights as strings.
/// Blank or unparseable strings are treated as zero; the transformers
/// decide per field whether zero means "absent".
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

/// Normalizes an attribute name or value label for value-map lookups
///
/// Lookups are case-insensitive and whitespace-tolerant; the original
/// casing is preserved in the destination output.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Rounds a computed unit price to cents
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
