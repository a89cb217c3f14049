//! Per-entity migration tasks
//!
//! A [`MigrationTask`] adapts one entity type to the generic runner: it
//! knows how to read a source id off a page item, what idempotency marker
//! identifies the item on the destination, and how to transform the item
//! into a destination payload. Tasks are pure; all I/O stays in the
//! runner.

use crate::core::transform::{catalog, customers, orders};
use crate::domain::{
    CategoryMap, EntityType, IdMap, SourceCustomer, SourceOrder, SourceProduct, SourceVariation,
};
use serde_json::Value;
use std::collections::HashMap;

/// Result of transforming one page item
#[derive(Debug, Clone, Default)]
pub struct TaskOutput {
    /// Destination payload; absent when the item was rejected
    pub payload: Option<Value>,

    /// Rendered warnings attached to the item
    pub warnings: Vec<String>,

    /// Rejection reasons; non-empty means the item failed transform and
    /// must not be written
    pub errors: Vec<String>,
}

impl TaskOutput {
    fn rejected(errors: Vec<String>) -> Self {
        Self {
            payload: None,
            warnings: Vec::new(),
            errors,
        }
    }
}

/// Adapts one entity type to the migration runner
pub trait MigrationTask: Send + Sync {
    /// Entity type this task migrates
    fn entity(&self) -> EntityType;

    /// Reads the source id off a raw page item
    fn source_id(&self, item: &Value) -> Option<u64>;

    /// Deterministic idempotency marker for the item
    fn external_id(&self, item: &Value) -> String;

    /// Destination field the marker is looked up under
    fn marker_field(&self) -> &'static str;

    /// Transforms a raw page item into a destination payload
    fn transform(&self, item: &Value) -> TaskOutput;
}

fn item_source_id(item: &Value) -> Option<u64> {
    item.get("id").and_then(Value::as_u64)
}

/// Migrates products (with their variations)
///
/// The category map and per-product variation lists are supplied by the
/// caller before the run; the task never fetches them itself.
pub struct ProductTask {
    categories: CategoryMap,
    variations: HashMap<u64, Vec<SourceVariation>>,
}

impl ProductTask {
    pub fn new(categories: CategoryMap, variations: HashMap<u64, Vec<SourceVariation>>) -> Self {
        Self {
            categories,
            variations,
        }
    }
}

impl MigrationTask for ProductTask {
    fn entity(&self) -> EntityType {
        EntityType::Product
    }

    fn source_id(&self, item: &Value) -> Option<u64> {
        item_source_id(item)
    }

    /// Products are identified on the destination by SKU, which is
    /// deterministic either way: the source SKU when present, the
    /// synthesized `wc-{id}` otherwise.
    fn external_id(&self, item: &Value) -> String {
        let sku = item.get("sku").and_then(Value::as_str).unwrap_or("");
        if sku.trim().is_empty() {
            format!("wc-{}", item_source_id(item).unwrap_or(0))
        } else {
            sku.to_string()
        }
    }

    fn marker_field(&self) -> &'static str {
        "sku"
    }

    fn transform(&self, item: &Value) -> TaskOutput {
        let product: SourceProduct = match serde_json::from_value(item.clone()) {
            Ok(product) => product,
            Err(e) => return TaskOutput::rejected(vec![format!("Malformed product record: {e}")]),
        };

        let variations = self.variations.get(&product.id).map(Vec::as_slice);
        match catalog::transform_product(&product, variations, &self.categories) {
            Ok(transformed) => TaskOutput {
                payload: serde_json::to_value(&transformed.product).ok(),
                warnings: transformed.warnings.iter().map(|w| w.to_string()).collect(),
                errors: Vec::new(),
            },
            Err(rejection) => TaskOutput::rejected(rejection.errors),
        }
    }
}

/// Migrates customer accounts
///
/// Runs after products and before orders so the order phase can resolve
/// `customer_id` through the mapping this task builds.
pub struct CustomerTask;

impl MigrationTask for CustomerTask {
    fn entity(&self) -> EntityType {
        EntityType::Customer
    }

    fn source_id(&self, item: &Value) -> Option<u64> {
        item_source_id(item)
    }

    /// Customers are identified on the destination by their lowercased
    /// email address.
    fn external_id(&self, item: &Value) -> String {
        let email = item.get("email").and_then(Value::as_str).unwrap_or("");
        customers::customer_external_id(email)
    }

    fn marker_field(&self) -> &'static str {
        "email"
    }

    fn transform(&self, item: &Value) -> TaskOutput {
        let customer: SourceCustomer = match serde_json::from_value(item.clone()) {
            Ok(customer) => customer,
            Err(e) => {
                return TaskOutput::rejected(vec![format!("Malformed customer record: {e}")])
            }
        };

        match customers::transform_customer(&customer) {
            Ok(transformed) => TaskOutput {
                payload: serde_json::to_value(&transformed.customer).ok(),
                warnings: transformed.warnings.iter().map(|w| w.to_string()).collect(),
                errors: Vec::new(),
            },
            Err(rejection) => TaskOutput::rejected(rejection.errors),
        }
    }
}

/// Migrates orders against previously built product/customer mappings
pub struct OrderTask {
    product_map: IdMap,
    customer_map: IdMap,
}

impl OrderTask {
    pub fn new(product_map: IdMap, customer_map: IdMap) -> Self {
        Self {
            product_map,
            customer_map,
        }
    }
}

impl MigrationTask for OrderTask {
    fn entity(&self) -> EntityType {
        EntityType::Order
    }

    fn source_id(&self, item: &Value) -> Option<u64> {
        item_source_id(item)
    }

    fn external_id(&self, item: &Value) -> String {
        orders::order_external_id(item_source_id(item).unwrap_or(0))
    }

    fn marker_field(&self) -> &'static str {
        "external_id"
    }

    fn transform(&self, item: &Value) -> TaskOutput {
        let order: SourceOrder = match serde_json::from_value(item.clone()) {
            Ok(order) => order,
            Err(e) => return TaskOutput::rejected(vec![format!("Malformed order record: {e}")]),
        };

        let ctx = orders::OrderContext {
            product_map: &self.product_map,
            customer_map: &self.customer_map,
        };
        let transformed = orders::transform_order(&order, &ctx);

        TaskOutput {
            payload: serde_json::to_value(&transformed.order).ok(),
            warnings: transformed.warnings.iter().map(|w| w.to_string()).collect(),
            errors: Vec::new(),
        }
    }
}
