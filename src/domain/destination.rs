//! Destination platform (BigCommerce) domain models
//!
//! These records are shaped for the BigCommerce V3 catalog and V2 orders
//! APIs. They carry the destination's stricter constraints: a SKU is
//! always present, product type is an enum rather than a free string, and
//! variant counts are bounded by [`MAX_VARIANTS_PER_PRODUCT`].

use serde::{Deserialize, Serialize};

/// Hard platform limit on variants per product
///
/// Variant lists longer than this are truncated (stable source order
/// retained) with a warning; exceeding the limit is never a fatal error.
pub const MAX_VARIANTS_PER_PRODUCT: usize = 600;

/// Destination product type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Ships physically; carries a weight
    Physical,
    /// Virtual or downloadable; weight forced to zero
    Digital,
}

/// Destination product availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Purchasable
    Available,
    /// Not purchasable (e.g. out of stock at the source)
    Disabled,
}

/// How inventory is tracked on the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryTracking {
    /// Not tracked
    None,
    /// Tracked at the product level
    Product,
    /// Tracked per variant
    Variant,
}

/// UI widget used to render an option on the destination storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionDisplayType {
    /// Color swatches
    Swatch,
    /// Rectangular buttons
    Rectangles,
    /// Plain dropdown (default)
    Dropdown,
}

/// A product ready to be created on the destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationProduct {
    pub name: String,

    #[serde(rename = "type")]
    pub product_type: ProductType,

    /// Never empty; synthesized as `wc-{source_id}` when the source SKU
    /// is blank
    pub sku: String,

    pub weight: f64,

    pub price: f64,

    /// Regular price, exposed only when a valid sale price is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<f64>,

    /// Sale price; only present when strictly below the regular price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,

    /// Destination category ids
    pub categories: Vec<u64>,

    pub is_visible: bool,

    pub availability: Availability,

    pub inventory_level: i64,

    pub inventory_tracking: InventoryTracking,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub images: Vec<DestinationImage>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<DestinationOption>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub variants: Vec<DestinationVariant>,
}

/// A product image on the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationImage {
    pub image_url: String,

    /// Exactly one image per product is the thumbnail (the first)
    pub is_thumbnail: bool,

    pub sort_order: i32,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
}

/// An option definition (e.g. "Color") with an ordered value list
///
/// The position of a value in `option_values` **is** the value index
/// referenced by variants, so ordering is load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationOption {
    pub display_name: String,

    #[serde(rename = "type")]
    pub display_type: OptionDisplayType,

    pub sort_order: i32,

    pub option_values: Vec<DestinationOptionValue>,
}

/// A single value of an option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationOptionValue {
    pub label: String,
    pub sort_order: i32,
}

/// A SKU-bearing combination of option values for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationVariant {
    /// Never empty; synthesized as `{parent_sku}-var-{source_id}` when
    /// the source variation SKU is blank
    pub sku: String,

    pub price: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,

    pub weight: f64,

    pub purchasing_disabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchasing_disabled_message: Option<String>,

    /// Pairs into the parent product's option/value index space
    pub option_values: Vec<VariantOptionValue>,
}

/// A resolved option/value index pair on a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOptionValue {
    pub option_index: usize,
    pub value_index: usize,
}

/// A customer-create payload for the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationCustomer {
    /// Never empty; doubles as the idempotency marker
    pub email: String,

    pub first_name: String,
    pub last_name: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub company: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub phone: String,
}

/// An order-create payload for the destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationOrder {
    pub status_id: u64,

    /// Destination customer id; 0 for guest orders
    pub customer_id: u64,

    pub billing_address: DestinationAddress,

    pub shipping_addresses: Vec<DestinationAddress>,

    /// Order line items
    pub products: Vec<DestinationLineItem>,

    pub subtotal_ex_tax: f64,
    pub subtotal_inc_tax: f64,
    pub shipping_cost_ex_tax: f64,
    pub shipping_cost_inc_tax: f64,
    pub total_ex_tax: f64,
    pub total_inc_tax: f64,

    /// Refund history summary, when the source order had refunds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_message: Option<String>,

    /// Deterministic idempotency marker derived from the source order id
    pub external_id: String,

    pub external_source: String,
}

/// A billing or shipping address on a destination order
///
/// All fields are required by the destination; the order transformer
/// fills blanks with documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationAddress {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub street_1: String,
    pub street_2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub country_iso2: String,
    pub email: String,
    pub phone: String,
}

/// A line item on a destination order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationLineItem {
    /// Destination product id; absent for custom line items whose source
    /// product could not be resolved through the id mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,

    pub name: String,

    pub quantity: i64,

    /// Unit price, tax inclusive
    pub price_inc_tax: f64,

    /// Unit price, tax exclusive
    pub price_ex_tax: f64,
}
