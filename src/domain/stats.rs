//! Per-run migration statistics
//!
//! This module defines the stats accumulator the migration runner fills
//! while processing one entity type.

use serde::{Deserialize, Serialize};

/// Accumulated counts and warnings for one migration run
///
/// Created fresh per run and returned to the caller; the full tuple
/// (`total/successful/skipped/failed`) plus the flat warnings list is
/// always surfaced, never partially hidden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationStats {
    /// Items considered after filtering
    pub total: usize,

    /// Items written to the destination this run
    pub successful: usize,

    /// Items already present on the destination (idempotency hit)
    pub skipped: usize,

    /// Items that failed transform or write
    pub failed: usize,

    /// Rendered warnings, in processing order
    pub warnings: Vec<String>,
}

impl MigrationStats {
    /// Creates an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful destination write
    pub fn record_success(&mut self) {
        self.successful += 1;
    }

    /// Records an idempotency skip
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Records a failed item together with the reason
    pub fn record_failure(&mut self, warning: impl Into<String>) {
        self.failed += 1;
        self.warnings.push(warning.into());
    }

    /// Appends a warning without changing any count
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Items accounted for so far
    pub fn processed(&self) -> usize {
        self.successful + self.skipped + self.failed
    }

    /// Merges another run's stats into this one
    pub fn merge(&mut self, other: MigrationStats) {
        self.total += other.total;
        self.successful += other.successful;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.warnings.extend(other.warnings);
    }

    /// One-line summary for logs and CLI output
    pub fn summary(&self) -> String {
        format!(
            "total={} successful={} skipped={} failed={} warnings={}",
            self.total,
            self.successful,
            self.skipped,
            self.failed,
            self.warnings.len()
        )
    }
}
