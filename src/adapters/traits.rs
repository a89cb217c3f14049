//! Platform client traits
//!
//! These traits define the minimal interface the migration core consumes.
//! The concrete WooCommerce and BigCommerce adapters implement them over
//! HTTP; the test suite implements them in memory.

use crate::domain::{EntityType, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Filter pairs passed to paginated list calls
pub type Filters = [(String, String)];

/// One page of a destination list call
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Items on this page
    pub items: Vec<Value>,

    /// Total item count across all pages, when the platform reports one
    pub total: Option<u64>,
}

/// Paginated read access to the source platform
///
/// Page-number based; callers stop on the first empty page.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetches one page of an entity collection
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or rejects the
    /// request.
    async fn fetch_page(
        &self,
        entity: EntityType,
        page: u32,
        per_page: u32,
        filters: &Filters,
    ) -> Result<Vec<Value>>;

    /// Returns the total item count for an entity type
    async fn count(&self, entity: EntityType) -> Result<u64>;
}

/// Write and lookup access to the destination platform
#[async_trait]
pub trait DestinationClient: Send + Sync {
    /// Creates an entity and returns the created record (with its id)
    ///
    /// # Errors
    ///
    /// Returns an error if the destination rejects the payload or cannot
    /// be reached.
    async fn create(&self, entity: EntityType, payload: &Value) -> Result<Value>;

    /// Lists entities with filters, page-number based
    async fn list(
        &self,
        entity: EntityType,
        filters: &Filters,
        page: u32,
        limit: u32,
    ) -> Result<ListPage>;

    /// Returns a cheap aggregate count, when the platform offers one
    ///
    /// `Ok(None)` means no aggregate is available and callers should fall
    /// back to exhaustive pagination counting.
    async fn count(&self, entity: EntityType) -> Result<Option<u64>>;
}

/// Extracts the numeric `id` field from a created/listed record
pub fn record_id(record: &Value) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&json!({"id": 42, "name": "x"})), Some(42));
        assert_eq!(record_id(&json!({"name": "x"})), None);
        assert_eq!(record_id(&json!({"id": "42"})), None);
    }
}
