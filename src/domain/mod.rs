//! Core domain types and models
//!
//! This module holds the source- and destination-shaped records, the id
//! mapping tables, the per-run stats accumulator, the transform warning
//! kinds, and the crate-wide error hierarchy.

pub mod destination;
pub mod entity;
pub mod errors;
pub mod mapping;
pub mod result;
pub mod source;
pub mod stats;
pub mod warning;

pub use destination::{
    Availability, DestinationAddress, DestinationCustomer, DestinationImage, DestinationLineItem,
    DestinationOption, DestinationOptionValue, DestinationOrder, DestinationProduct,
    DestinationVariant, InventoryTracking, OptionDisplayType, ProductType, VariantOptionValue,
    MAX_VARIANTS_PER_PRODUCT,
};
pub use entity::EntityType;
pub use errors::{BigCommerceError, CaravanError, WooCommerceError};
pub use mapping::{CategoryMap, IdMap};
pub use result::Result;
pub use source::{
    SourceAddress, SourceAttribute, SourceCategoryRef, SourceCustomer, SourceImage,
    SourceLineItem, SourceOrder, SourceProduct, SourceRefund, SourceVariation,
    SourceVariationAttribute,
};
pub use stats::MigrationStats;
pub use warning::TransformWarning;
