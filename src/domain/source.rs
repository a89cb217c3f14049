//! Source platform (WooCommerce) domain models
//!
//! These records mirror the JSON shapes returned by the WooCommerce REST
//! API v3. Every field is defaulted so that partial payloads from older
//! store versions still deserialize; the transformers, not the models,
//! decide what is required.

use serde::{Deserialize, Serialize};

/// A product as returned by the source platform
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceProduct {
    /// Source product id
    pub id: u64,

    /// Product name (required by the catalog transformer)
    pub name: String,

    /// SKU; may be blank, in which case one is synthesized downstream
    pub sku: String,

    /// Declared product type ("simple", "variable", ...)
    #[serde(rename = "type")]
    pub product_type: String,

    /// Publication status ("publish", "draft", ...)
    pub status: String,

    /// Catalog visibility ("visible", "catalog", "search", "hidden")
    pub catalog_visibility: String,

    /// Virtual products have no physical form
    #[serde(rename = "virtual")]
    pub is_virtual: bool,

    /// Whether the product is downloadable
    pub downloadable: bool,

    /// Whether the product requires shipping
    #[serde(default = "default_true")]
    pub shipping_required: bool,

    /// Weight as a decimal string; may be blank
    pub weight: String,

    /// Current price as a decimal string
    pub price: String,

    /// Regular (non-sale) price as a decimal string
    pub regular_price: String,

    /// Sale price as a decimal string; blank when not on sale
    pub sale_price: String,

    /// Whether stock levels are managed for this product
    pub manage_stock: bool,

    /// Stock status ("instock", "outofstock", "onbackorder")
    pub stock_status: String,

    /// Stock quantity when managed
    pub stock_quantity: Option<i64>,

    /// Assigned categories
    pub categories: Vec<SourceCategoryRef>,

    /// Product images in display order
    pub images: Vec<SourceImage>,

    /// Product attributes; only those with `variation = true` participate
    /// in variant generation
    pub attributes: Vec<SourceAttribute>,
}

fn default_true() -> bool {
    true
}

/// Reference to a category assigned to a product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCategoryRef {
    pub id: u64,
    pub name: String,
}

/// A product image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceImage {
    pub src: String,
    pub alt: String,
}

/// A product attribute definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceAttribute {
    pub name: String,

    /// Ordered attribute values; the order is load-bearing for variant
    /// index alignment
    pub options: Vec<String>,

    /// Whether this attribute participates in variant generation
    pub variation: bool,
}

/// A single variation of a variable product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceVariation {
    /// Source variation id
    pub id: u64,

    /// Variation SKU; may be blank
    pub sku: String,

    /// Current price as a decimal string
    pub price: String,

    /// Regular price as a decimal string
    pub regular_price: String,

    /// Sale price as a decimal string; blank when not on sale
    pub sale_price: String,

    /// Whether the variation can currently be purchased
    #[serde(default = "default_true")]
    pub purchasable: bool,

    /// Stock status ("instock", "outofstock")
    pub stock_status: String,

    /// Weight as a decimal string; may be blank
    pub weight: String,

    /// Attribute selections identifying this variation
    pub attributes: Vec<SourceVariationAttribute>,
}

/// One attribute selection on a variation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceVariationAttribute {
    pub name: String,

    /// Selected value label
    pub option: String,
}

/// A customer account as returned by the source platform
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCustomer {
    /// Source customer id
    pub id: u64,

    /// Account email; required, it identifies the customer on both
    /// platforms
    pub email: String,

    pub first_name: String,
    pub last_name: String,

    /// Login name; used as a name fallback when no real name is set
    pub username: String,

    /// Billing address on file; carries company and phone
    pub billing: SourceAddress,
}

/// An order as returned by the source platform
///
/// The monetary totals on this record are trusted aggregate fields; the
/// order transformer uses them directly rather than re-deriving totals
/// from line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOrder {
    /// Source order id
    pub id: u64,

    /// Source order status ("pending", "processing", "completed", ...)
    pub status: String,

    /// Source customer id; 0 for guest checkout
    pub customer_id: u64,

    /// Grand total, tax inclusive
    pub total: String,

    /// Total tax
    pub total_tax: String,

    /// Shipping cost, tax exclusive
    pub shipping_total: String,

    /// Tax charged on shipping
    pub shipping_tax: String,

    /// Billing address
    pub billing: SourceAddress,

    /// Shipping address; may be entirely blank for digital orders
    pub shipping: SourceAddress,

    /// Order line items
    pub line_items: Vec<SourceLineItem>,

    /// Refunds issued against this order
    pub refunds: Vec<SourceRefund>,

    /// Note left by the customer at checkout
    pub customer_note: String,
}

/// A billing or shipping address on a source order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceAddress {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,

    /// ISO 3166-1 alpha-2 country code
    pub country: String,

    pub email: String,
    pub phone: String,
}

impl SourceAddress {
    /// An address with no street line carries no usable shipping
    /// destination; the transformer falls back to billing in that case.
    pub fn has_street(&self) -> bool {
        !self.address_1.trim().is_empty()
    }
}

/// A line item on a source order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLineItem {
    pub id: u64,

    /// Source product id this line refers to
    pub product_id: u64,

    pub name: String,
    pub quantity: i64,

    /// Line total, tax inclusive, as a decimal string
    pub total: String,

    /// Tax portion of the line total, as a decimal string
    pub total_tax: String,
}

/// A refund recorded against a source order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRefund {
    pub id: u64,

    /// Refunded amount as a decimal string
    pub total: String,

    pub reason: String,
}
