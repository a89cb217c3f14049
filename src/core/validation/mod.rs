//! Post-migration validation
//!
//! Read-only reconciliation between the two platforms. Nothing here
//! mutates either side; the output is a report, not a repair.

pub mod checks;
pub mod report;

pub use checks::{HttpProber, UrlProber, Validator, ValidatorConfig, PRICE_TOLERANCE};
pub use report::{CheckResult, CheckStatus, ValidationReport};
