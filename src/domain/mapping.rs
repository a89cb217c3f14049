//! Identifier mapping tables
//!
//! This module defines the append-only source→destination id tables that
//! make runs resumable and let later entity types reference ids created
//! by earlier ones (order line items need the product mapping).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Append-only map from source entity id to destination entity id
///
/// One entry is added per successfully processed item. The map is
/// persisted across runs by the caller (see `core::migrate::state`), so a
/// re-run can skip already-migrated items and orders can resolve product
/// and customer references from prior runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdMap(HashMap<u64, u64>);

impl IdMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a source→destination pair
    pub fn insert(&mut self, source_id: u64, destination_id: u64) {
        self.0.insert(source_id, destination_id);
    }

    /// Looks up the destination id for a source id
    pub fn get(&self, source_id: u64) -> Option<u64> {
        self.0.get(&source_id).copied()
    }

    /// Whether a source id has been mapped
    pub fn contains(&self, source_id: u64) -> bool {
        self.0.contains_key(&source_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Source ids present in this map
    pub fn source_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.keys().copied()
    }

    /// Absorbs all entries from another map
    pub fn merge(&mut self, other: &IdMap) {
        for (source, destination) in &other.0 {
            self.0.insert(*source, *destination);
        }
    }
}

impl FromIterator<(u64, u64)> for IdMap {
    fn from_iter<T: IntoIterator<Item = (u64, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Category name → destination category id lookup
///
/// Built before the product run from the destination's category list (the
/// category-sync step itself happens earlier) and treated as read-only by
/// the transformers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryMap(HashMap<String, u64>);

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category name under its destination id
    pub fn insert(&mut self, name: impl Into<String>, destination_id: u64) {
        self.0.insert(name.into(), destination_id);
    }

    /// Resolves a source category name to a destination id
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for CategoryMap {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
