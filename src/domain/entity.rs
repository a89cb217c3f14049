//! Migratable entity types
//!
//! This module defines the entity types the migration runner and
//! validation engine operate on.

use crate::domain::{CaravanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity types handled by the migration
///
/// Entity types are migrated in a fixed dependency order by the caller:
/// categories first, then products, then customers, then orders. The
/// runner itself does not enforce this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Product categories
    Category,
    /// Products (including their variants)
    Product,
    /// Customer accounts
    Customer,
    /// Orders
    Order,
}

impl EntityType {
    /// REST collection path segment on the source platform
    pub fn source_path(&self) -> &'static str {
        match self {
            EntityType::Category => "products/categories",
            EntityType::Product => "products",
            EntityType::Customer => "customers",
            EntityType::Order => "orders",
        }
    }

    /// Human-readable singular label used in log and warning messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Category => "category",
            EntityType::Product => "product",
            EntityType::Customer => "customer",
            EntityType::Order => "order",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityType {
    type Err = CaravanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "category" | "categories" => Ok(Self::Category),
            "product" | "products" => Ok(Self::Product),
            "customer" | "customers" => Ok(Self::Customer),
            "order" | "orders" => Ok(Self::Order),
            _ => Err(CaravanError::Configuration(format!(
                "Unknown entity type: {s}. Expected one of: category, product, customer, order"
            ))),
        }
    }
}
