//! Validation report structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single reconciliation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The platforms agree
    Pass,
    /// Partial agreement worth human attention
    Warning,
    /// The platforms disagree
    Fail,
    /// Nothing comparable was found (distinct from disagreement)
    Skipped,
}

/// Result of one check in the battery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }
}

/// Post-migration reconciliation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// When validation was performed
    pub validated_at: DateTime<Utc>,

    /// Individual check results, in battery order
    pub checks: Vec<CheckResult>,

    /// Duration of validation in milliseconds
    pub duration_ms: u64,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            validated_at: Utc::now(),
            checks: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Appends one check result
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Aggregate status: fail if any check failed, else warning if any
    /// warned, else pass
    pub fn aggregate_status(&self) -> CheckStatus {
        if self.checks.iter().any(|c| c.status == CheckStatus::Fail) {
            CheckStatus::Fail
        } else if self
            .checks
            .iter()
            .any(|c| c.status == CheckStatus::Warning)
        {
            CheckStatus::Warning
        } else {
            CheckStatus::Pass
        }
    }

    pub fn is_success(&self) -> bool {
        self.aggregate_status() != CheckStatus::Fail
    }

    /// Formats the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Validation Report\n");
        summary.push_str(&format!("  Validated at: {}\n", self.validated_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));

        for check in &self.checks {
            let marker = match check.status {
                CheckStatus::Pass => "✅",
                CheckStatus::Warning => "⚠️ ",
                CheckStatus::Fail => "❌",
                CheckStatus::Skipped => "⏭️ ",
            };
            summary.push_str(&format!("  {marker} {}: {}\n", check.name, check.detail));
        }

        summary.push_str(&format!("  Overall: {:?}\n", self.aggregate_status()));
        summary
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
