//! Progress events emitted by the migration runner
//!
//! Events flow over a bounded channel the caller drains; producer and
//! consumer proceed in lockstep, which is the natural backpressure for a
//! strictly sequential run. `Completed` and `Failed` are terminal: the
//! runner never emits after either.

use crate::domain::{EntityType, IdMap, MigrationStats};
use tokio::sync::mpsc;

/// Bounded channel capacity for progress events
///
/// Small on purpose: the consumer is expected to keep up with the
/// sequential, rate-limited producer.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 16;

/// One message on the progress stream
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The run passed setup and entered the processing loop
    Started {
        entity: EntityType,
        /// Items to process after filtering
        total: usize,
    },

    /// One item finished processing (written, skipped or failed)
    Progress {
        entity: EntityType,
        /// Source id of the item just processed
        source_id: u64,
        /// Cumulative stats up to and including this item
        stats: MigrationStats,
    },

    /// Terminal: the run completed
    Completed {
        entity: EntityType,
        stats: MigrationStats,
        /// Source ids newly written this run
        migrated_ids: Vec<u64>,
        /// Full id-mapping table for this run
        id_map: IdMap,
    },

    /// Terminal: the run aborted during setup
    Failed { entity: EntityType, message: String },
}

impl ProgressEvent {
    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Completed { .. } | ProgressEvent::Failed { .. }
        )
    }
}

/// Creates the bounded progress channel
pub fn progress_channel() -> (mpsc::Sender<ProgressEvent>, mpsc::Receiver<ProgressEvent>) {
    mpsc::channel(PROGRESS_CHANNEL_CAPACITY)
}

/// Sends an event, ignoring a dropped receiver
///
/// A consumer that stopped listening must not stall the run; a run
/// always proceeds to completion once started.
pub(crate) async fn emit(sender: &mpsc::Sender<ProgressEvent>, event: ProgressEvent) {
    let _ = sender.send(event).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        let completed = ProgressEvent::Completed {
            entity: EntityType::Product,
            stats: MigrationStats::new(),
            migrated_ids: vec![],
            id_map: IdMap::new(),
        };
        assert!(completed.is_terminal());

        let failed = ProgressEvent::Failed {
            entity: EntityType::Product,
            message: "setup failed".to_string(),
        };
        assert!(failed.is_terminal());

        let started = ProgressEvent::Started {
            entity: EntityType::Product,
            total: 3,
        };
        assert!(!started.is_terminal());
    }

    #[tokio::test]
    async fn test_emit_ignores_dropped_receiver() {
        let (sender, receiver) = progress_channel();
        drop(receiver);

        // Must not error or hang
        emit(
            &sender,
            ProgressEvent::Started {
                entity: EntityType::Order,
                total: 1,
            },
        )
        .await;
    }
}
