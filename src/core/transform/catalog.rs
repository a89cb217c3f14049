//! Product catalog transformation
//!
//! Maps source products into destination products, enforcing the
//! destination's invariants: a SKU is always present, product type is
//! derived from the virtual/downloadable flags, physical products carry a
//! weight, and the sale-price/retail-price pair is only populated for a
//! genuine discount.

use crate::core::transform::{parse_amount, variants};
use crate::domain::destination::{
    Availability, DestinationImage, DestinationProduct, InventoryTracking, ProductType,
};
use crate::domain::mapping::CategoryMap;
use crate::domain::source::{SourceProduct, SourceVariation};
use crate::domain::warning::TransformWarning;
use std::collections::HashMap;

/// Default weight for physical products whose source weight is blank or
/// zero. Variants carry no such default; a blank variant weight becomes 0
/// without a warning.
const DEFAULT_PHYSICAL_WEIGHT: f64 = 1.0;

/// A product that transformed cleanly, plus any warnings attached to it
#[derive(Debug, Clone)]
pub struct TransformedProduct {
    pub source_id: u64,
    pub product: DestinationProduct,
    pub warnings: Vec<TransformWarning>,
}

/// A product the transformer refused outright
///
/// A rejected product must be treated as failed and never written to the
/// destination.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRejection {
    pub source_id: u64,
    pub errors: Vec<String>,
}

/// Transforms a simple (non-variable) source product
///
/// Rejects the product if its name is empty. Derives SKU, type, weight,
/// price fields, visibility, availability and inventory settings per the
/// destination invariants. Unmapped categories are silently dropped; a
/// warning is attached only when the source had categories but none
/// mapped.
pub fn transform_simple_product(
    product: &SourceProduct,
    categories: &CategoryMap,
) -> Result<TransformedProduct, ProductRejection> {
    if product.name.trim().is_empty() {
        return Err(ProductRejection {
            source_id: product.id,
            errors: vec!["Product name is required".to_string()],
        });
    }

    let mut warnings = Vec::new();

    let sku = if product.sku.trim().is_empty() {
        format!("wc-{}", product.id)
    } else {
        product.sku.clone()
    };

    let product_type = derive_product_type(product);

    let weight = match product_type {
        ProductType::Digital => 0.0,
        ProductType::Physical => {
            let weight = parse_amount(&product.weight);
            if weight <= 0.0 {
                warnings.push(TransformWarning::WeightDefaulted {
                    product_id: product.id,
                });
                DEFAULT_PHYSICAL_WEIGHT
            } else {
                weight
            }
        }
    };

    let (price, sale_price, retail_price) = derive_prices(product);

    let is_visible = product.catalog_visibility != "hidden" && product.status == "publish";

    let availability = if product.stock_status == "outofstock" {
        Availability::Disabled
    } else {
        Availability::Available
    };

    let inventory_tracking = if product.manage_stock {
        InventoryTracking::Product
    } else {
        InventoryTracking::None
    };
    let inventory_level = product.stock_quantity.unwrap_or(0).max(0);

    let mapped_categories: Vec<u64> = product
        .categories
        .iter()
        .filter_map(|c| categories.get(&c.name))
        .collect();
    if !product.categories.is_empty() && mapped_categories.is_empty() {
        warnings.push(TransformWarning::NoCategoriesMapped {
            product_id: product.id,
        });
    }

    let images: Vec<DestinationImage> = product
        .images
        .iter()
        .enumerate()
        .map(|(i, image)| DestinationImage {
            image_url: image.src.clone(),
            is_thumbnail: i == 0,
            sort_order: i as i32,
            description: image.alt.clone(),
        })
        .collect();

    Ok(TransformedProduct {
        source_id: product.id,
        product: DestinationProduct {
            name: product.name.clone(),
            product_type,
            sku,
            weight,
            price,
            retail_price,
            sale_price,
            categories: mapped_categories,
            is_visible,
            availability,
            inventory_level,
            inventory_tracking,
            images,
            options: Vec::new(),
            variants: Vec::new(),
        },
        warnings,
    })
}

/// Transforms a variable source product together with its variations
///
/// Performs the same base mapping as the simple path, then attaches the
/// option/variant set. When variants were produced, inventory tracking
/// moves to the variant level and the displayed price becomes the minimum
/// variant price (the "starting from" policy). When the variant step
/// produced nothing, the base simple mapping stands.
pub fn transform_variable_product(
    product: &SourceProduct,
    variations: &[SourceVariation],
    categories: &CategoryMap,
) -> Result<TransformedProduct, ProductRejection> {
    let mut base = transform_simple_product(product, categories)?;

    let set = variants::transform_variations(
        product.id,
        variations,
        &product.attributes,
        &base.product.sku,
    );
    base.warnings.extend(set.warnings);

    if set.variants.is_empty() {
        return Ok(base);
    }

    let starting_price = set
        .variants
        .iter()
        .map(|v| v.price)
        .fold(f64::INFINITY, f64::min);

    base.product.price = starting_price;
    base.product.inventory_tracking = InventoryTracking::Variant;
    base.product.options = set.options;
    base.product.variants = set.variants;

    Ok(base)
}

/// Routes a product to the variable or simple path
///
/// The variable path is used only if the product's declared type is
/// "variable" **and** a non-empty variations list is supplied; otherwise
/// the simple path applies even to a nominally variable product. This
/// fallback is an explicit policy, not an error.
pub fn transform_product(
    product: &SourceProduct,
    variations: Option<&[SourceVariation]>,
    categories: &CategoryMap,
) -> Result<TransformedProduct, ProductRejection> {
    match variations {
        Some(variations) if product.product_type == "variable" && !variations.is_empty() => {
            transform_variable_product(product, variations, categories)
        }
        _ => transform_simple_product(product, categories),
    }
}

/// A product that failed transformation, carrying its original input
#[derive(Debug, Clone)]
pub struct FailedProduct {
    pub product: SourceProduct,
    pub errors: Vec<String>,
}

/// Result of transforming a batch of products
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub successful: Vec<TransformedProduct>,
    pub failed: Vec<FailedProduct>,

    /// Every item's warnings, concatenated in input order
    pub warnings: Vec<TransformWarning>,
}

/// Transforms a batch of products, partitioning into successes and
/// failures
pub fn transform_product_batch(
    products: &[SourceProduct],
    variations_by_source_id: &HashMap<u64, Vec<SourceVariation>>,
    categories: &CategoryMap,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for product in products {
        let variations = variations_by_source_id.get(&product.id).map(Vec::as_slice);
        match transform_product(product, variations, categories) {
            Ok(transformed) => {
                outcome.warnings.extend(transformed.warnings.clone());
                outcome.successful.push(transformed);
            }
            Err(rejection) => outcome.failed.push(FailedProduct {
                product: product.clone(),
                errors: rejection.errors,
            }),
        }
    }

    outcome
}

fn derive_product_type(product: &SourceProduct) -> ProductType {
    if product.is_virtual || (product.downloadable && !product.shipping_required) {
        ProductType::Digital
    } else {
        ProductType::Physical
    }
}

/// Derives the price triple: displayed price, sale price, retail price
///
/// The sale price is only populated when present and strictly below the
/// regular price; in that case the regular price is also exposed as the
/// retail price.
fn derive_prices(product: &SourceProduct) -> (f64, Option<f64>, Option<f64>) {
    let mut regular = parse_amount(&product.regular_price);
    if regular <= 0.0 {
        regular = parse_amount(&product.price);
    }

    let sale = parse_amount(&product.sale_price);
    if sale > 0.0 && sale < regular {
        (regular, Some(sale), Some(regular))
    } else {
        (regular, None, None)
    }
}
