//! Run state persistence
//!
//! The runner itself holds no cross-run state; resumability comes from
//! this JSON state file the caller loads before a run and saves after.
//! It carries the per-entity id maps, from which the already-migrated
//! sets are derived.

use crate::domain::{CaravanError, EntityType, IdMap, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Persisted migration state across runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationState {
    pub categories: IdMap,
    pub products: IdMap,
    pub customers: IdMap,
    pub orders: IdMap,
}

impl MigrationState {
    /// Loads state from a JSON file, returning empty state if the file
    /// does not exist yet
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No state file found, starting fresh");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| CaravanError::State(format!("Failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| CaravanError::State(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Saves state to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .map_err(|e| CaravanError::State(format!("Failed to write {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "State saved");
        Ok(())
    }

    /// The id map for an entity type
    pub fn map_for(&self, entity: EntityType) -> &IdMap {
        match entity {
            EntityType::Category => &self.categories,
            EntityType::Product => &self.products,
            EntityType::Customer => &self.customers,
            EntityType::Order => &self.orders,
        }
    }

    /// Mutable id map for an entity type
    pub fn map_for_mut(&mut self, entity: EntityType) -> &mut IdMap {
        match entity {
            EntityType::Category => &mut self.categories,
            EntityType::Product => &mut self.products,
            EntityType::Customer => &mut self.customers,
            EntityType::Order => &mut self.orders,
        }
    }

    /// Source ids already migrated for an entity type
    pub fn migrated_set(&self, entity: EntityType) -> HashSet<u64> {
        self.map_for(entity).source_ids().collect()
    }
}
