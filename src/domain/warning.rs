//! Transform warning kinds
//!
//! Warnings flag items that were still produced but degraded in some way
//! (an unmapped category, a truncated variant list). They are carried as a
//! tagged enum with structured fields and rendered to text only at the
//! reporting boundary, so tests can match on kind rather than on message
//! prose.

use std::fmt;

/// A non-fatal condition noticed while transforming an item
#[derive(Debug, Clone, PartialEq)]
pub enum TransformWarning {
    /// Physical product had a blank or zero weight; defaulted to 1
    WeightDefaulted { product_id: u64 },

    /// Source categories were present but none mapped to a destination id
    NoCategoriesMapped { product_id: u64 },

    /// No variation-participating attributes survived filtering; the
    /// caller falls back to the simple-product path
    NoVariationAttributes { product_id: u64 },

    /// A nominally variable product was supplied with no variations
    NoVariations { product_id: u64 },

    /// More variants were produced than the destination allows; the list
    /// was truncated in stable source order
    VariantLimitExceeded { product_id: u64, produced: usize },

    /// A variation attribute did not resolve in the value map and was
    /// dropped from that variant
    AttributeNotFound {
        variation_id: u64,
        attribute: String,
    },

    /// An order line item referenced a source product with no id mapping;
    /// it was migrated as a custom line item
    UnmappedLineItemProduct { order_id: u64, product_id: u64 },

    /// Customer had neither an account name nor a billing name; the
    /// login name was used instead
    CustomerNameMissing { customer_id: u64 },
}

impl fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformWarning::WeightDefaulted { product_id } => write!(
                f,
                "Product {product_id}: physical product has no weight, defaulting to 1"
            ),
            TransformWarning::NoCategoriesMapped { product_id } => write!(
                f,
                "Product {product_id}: source categories present but none mapped to a destination category"
            ),
            TransformWarning::NoVariationAttributes { product_id } => write!(
                f,
                "Product {product_id}: No variation attributes found, treating as simple product"
            ),
            TransformWarning::NoVariations { product_id } => write!(
                f,
                "Product {product_id}: variable product has no variations"
            ),
            TransformWarning::VariantLimitExceeded {
                product_id,
                produced,
            } => write!(
                f,
                "Product {product_id}: {produced} variants exceed the destination limit of 600, excess truncated"
            ),
            TransformWarning::AttributeNotFound {
                variation_id,
                attribute,
            } => write!(
                f,
                "Variation {variation_id}: attribute '{attribute}' not found in value map, dropped"
            ),
            TransformWarning::UnmappedLineItemProduct {
                order_id,
                product_id,
            } => write!(
                f,
                "Order {order_id}: line item references unmapped source product {product_id}, migrating as custom item"
            ),
            TransformWarning::CustomerNameMissing { customer_id } => write!(
                f,
                "Customer {customer_id}: no name on account or billing address, using login name"
            ),
        }
    }
}
