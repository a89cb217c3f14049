//! Migration runner
//!
//! The generic batch runner behind every entity type: paginate the
//! source, drop already-migrated items, then process the remainder
//! strictly one at a time (idempotency check, transform, write, fixed
//! delay). Sequential processing is intentional: later entity types
//! depend on the id mappings this run builds, and the destination is
//! rate-limited with a fixed inter-request delay rather than an adaptive
//! limiter.

use crate::adapters::traits::{record_id, DestinationClient, SourceClient};
use crate::core::migrate::progress::{emit, ProgressEvent};
use crate::core::migrate::task::MigrationTask;
use crate::domain::{CaravanError, IdMap, MigrationStats, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runner tuning knobs
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Source page size
    pub per_page: u32,

    /// Safety cap on pages fetched per run, guarding against a
    /// misbehaving pagination contract
    pub max_pages: u32,

    /// Fixed delay slept after each processed item
    pub request_delay: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            per_page: 50,
            max_pages: 500,
            request_delay: Duration::from_millis(350),
        }
    }
}

/// Mutable per-run state supplied by the caller
///
/// The already-migrated set and the id map are persisted externally
/// between runs; that persistence, not anything inside the runner, is
/// what makes re-runs resumable.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Source ids migrated by earlier runs; filtered out before
    /// processing
    pub already_migrated: HashSet<u64>,

    /// Source→destination mappings carried in from earlier runs; new
    /// entries are appended as items are processed
    pub id_map: IdMap,
}

/// Everything a completed run hands back to the caller
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: MigrationStats,

    /// Source ids newly written to the destination this run
    pub migrated_ids: Vec<u64>,

    /// The context's id map including this run's additions
    pub id_map: IdMap,
}

/// Generic per-entity migration runner
pub struct MigrationRunner {
    source: Arc<dyn SourceClient>,
    destination: Arc<dyn DestinationClient>,
    config: RunnerConfig,
}

impl MigrationRunner {
    pub fn new(
        source: Arc<dyn SourceClient>,
        destination: Arc<dyn DestinationClient>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            source,
            destination,
            config,
        }
    }

    /// Runs one entity type to completion
    ///
    /// A setup-level failure (the source cannot be paginated at all)
    /// aborts the run with a terminal `Failed` event. Per-item failures
    /// are recovered locally: the item is counted as failed with a
    /// warning and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns an error only for setup-level failures; a completed run
    /// always returns a report, whatever its failure count.
    pub async fn run(
        &self,
        task: &dyn MigrationTask,
        ctx: RunContext,
        progress: mpsc::Sender<ProgressEvent>,
    ) -> Result<RunReport> {
        let entity = task.entity();
        let RunContext {
            already_migrated,
            mut id_map,
        } = ctx;

        tracing::info!(entity = %entity, phase = "fetching", "Starting migration run");

        let items = match self.fetch_all(task).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(entity = %entity, error = %e, "Source fetch failed, aborting run");
                emit(
                    &progress,
                    ProgressEvent::Failed {
                        entity,
                        message: e.to_string(),
                    },
                )
                .await;
                return Err(CaravanError::Migration(format!(
                    "{entity} run aborted during fetch: {e}"
                )));
            }
        };

        tracing::debug!(entity = %entity, phase = "filtering", fetched = items.len(), "Filtering already-migrated items");
        let items: Vec<Value> = items
            .into_iter()
            .filter(|item| {
                task.source_id(item)
                    .map_or(true, |id| !already_migrated.contains(&id))
            })
            .collect();

        let mut stats = MigrationStats {
            total: items.len(),
            ..Default::default()
        };
        let mut migrated_ids = Vec::new();

        emit(
            &progress,
            ProgressEvent::Started {
                entity,
                total: items.len(),
            },
        )
        .await;

        for item in &items {
            // An item whose source id cannot be read has no usable
            // idempotency marker; writing it would not be re-run safe.
            let Some(source_id) = task.source_id(item) else {
                tracing::warn!(entity = %entity, "Item has no readable source id, counting as failed");
                stats.record_failure(format!("{entity}: item has no readable source id"));
                emit(
                    &progress,
                    ProgressEvent::Progress {
                        entity,
                        source_id: 0,
                        stats: stats.clone(),
                    },
                )
                .await;
                continue;
            };

            self.process_item(task, item, source_id, &mut stats, &mut id_map, &mut migrated_ids)
                .await;

            tokio::time::sleep(self.config.request_delay).await;

            emit(
                &progress,
                ProgressEvent::Progress {
                    entity,
                    source_id,
                    stats: stats.clone(),
                },
            )
            .await;
        }

        tracing::info!(entity = %entity, summary = %stats.summary(), "Migration run completed");

        emit(
            &progress,
            ProgressEvent::Completed {
                entity,
                stats: stats.clone(),
                migrated_ids: migrated_ids.clone(),
                id_map: id_map.clone(),
            },
        )
        .await;

        Ok(RunReport {
            stats,
            migrated_ids,
            id_map,
        })
    }

    /// Paginates the source entity type to exhaustion, bounded by the
    /// page-count safety cap
    async fn fetch_all(&self, task: &dyn MigrationTask) -> Result<Vec<Value>> {
        let entity = task.entity();
        let mut items = Vec::new();

        for page in 1..=self.config.max_pages {
            let batch = self
                .source
                .fetch_page(entity, page, self.config.per_page, &[])
                .await?;

            if batch.is_empty() {
                return Ok(items);
            }
            items.extend(batch);

            if page == self.config.max_pages {
                tracing::warn!(
                    entity = %entity,
                    max_pages = self.config.max_pages,
                    "Page safety cap reached, stopping fetch"
                );
            }
        }

        Ok(items)
    }

    /// Processes a single item: idempotency check, transform, write
    async fn process_item(
        &self,
        task: &dyn MigrationTask,
        item: &Value,
        source_id: u64,
        stats: &mut MigrationStats,
        id_map: &mut IdMap,
        migrated_ids: &mut Vec<u64>,
    ) {
        let entity = task.entity();
        let marker = task.external_id(item);
        let filters = [(task.marker_field().to_string(), marker.clone())];

        // Idempotency: an item already on the destination is recorded
        // and skipped, never rewritten.
        match self.destination.list(entity, &filters, 1, 1).await {
            Ok(page) => {
                if let Some(existing) = page.items.first() {
                    if let Some(destination_id) = record_id(existing) {
                        id_map.insert(source_id, destination_id);
                    }
                    tracing::debug!(entity = %entity, source_id, marker = %marker, "Already migrated, skipping");
                    stats.record_skip();
                    return;
                }
            }
            Err(e) => {
                stats.record_failure(format!(
                    "{entity} {source_id}: idempotency lookup failed: {e}"
                ));
                return;
            }
        }

        let output = task.transform(item);
        stats.warnings.extend(output.warnings);

        if !output.errors.is_empty() {
            tracing::warn!(entity = %entity, source_id, errors = ?output.errors, "Transform rejected item");
            stats.record_failure(format!(
                "{entity} {source_id}: {}",
                output.errors.join("; ")
            ));
            return;
        }

        let Some(payload) = output.payload else {
            stats.record_failure(format!(
                "{entity} {source_id}: transform produced no payload"
            ));
            return;
        };

        match self.destination.create(entity, &payload).await {
            Ok(created) => {
                if let Some(destination_id) = record_id(&created) {
                    id_map.insert(source_id, destination_id);
                }
                migrated_ids.push(source_id);
                stats.record_success();
            }
            Err(e) => {
                tracing::warn!(entity = %entity, source_id, error = %e, "Destination write failed");
                stats.record_failure(format!("{entity} {source_id}: write failed: {e}"));
            }
        }
    }
}
