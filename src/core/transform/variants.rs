//! Variant and option transformation
//!
//! Converts source variation attributes into destination option
//! definitions and individual variations into destination variants. Both
//! sides share a [`ValueMap`] built once per product, so the option/value
//! indices a variant references always line up with the option list.

use crate::core::transform::{normalize, parse_amount};
use crate::domain::destination::{
    DestinationOption, DestinationOptionValue, DestinationVariant, OptionDisplayType,
    VariantOptionValue, MAX_VARIANTS_PER_PRODUCT,
};
use crate::domain::source::{SourceAttribute, SourceVariation};
use crate::domain::warning::TransformWarning;
use std::collections::HashMap;

/// Picks the storefront widget for an option by its name
///
/// This is a presentation heuristic only: a case-insensitive substring
/// match on the attribute name. Its exact matching behavior is part of
/// the output contract, so it lives here as one lookup function rather
/// than as scattered conditionals.
pub fn option_display_type(name: &str) -> OptionDisplayType {
    let name = name.to_lowercase();
    if name.contains("color") || name.contains("colour") {
        OptionDisplayType::Swatch
    } else if name.contains("size") {
        OptionDisplayType::Rectangles
    } else {
        OptionDisplayType::Dropdown
    }
}

/// Index slot for one variation attribute
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSlot {
    /// Position among the variation-participating attributes, matching
    /// the position in the produced options list
    pub option_index: usize,

    /// Normalized value label → value index
    pub values: HashMap<String, usize>,
}

/// Lookup from a source attribute+value pair to a destination
/// option/value index pair
///
/// Keyed by normalized attribute name; value labels are normalized the
/// same way. Built once per product from its variation attributes and
/// treated as read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap(HashMap<String, OptionSlot>);

impl ValueMap {
    /// Resolves an attribute name and value label to an index pair
    pub fn resolve(&self, attribute: &str, label: &str) -> Option<VariantOptionValue> {
        let slot = self.0.get(&normalize(attribute))?;
        let value_index = *slot.values.get(&normalize(label))?;
        Some(VariantOptionValue {
            option_index: slot.option_index,
            value_index,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, attribute: &str, slot: OptionSlot) {
        self.0.insert(normalize(attribute), slot);
    }
}

/// Option definitions plus the value map they were built from
#[derive(Debug, Clone)]
pub struct OptionSet {
    pub options: Vec<DestinationOption>,
    pub value_map: ValueMap,
}

/// Builds destination options and the shared value map from source
/// attributes
///
/// Only attributes marked as variation-participating survive. Source
/// option-value order is preserved as the destination `option_values`
/// array; the array index **is** the value index referenced by variants.
pub fn options_from_attributes(attributes: &[SourceAttribute]) -> OptionSet {
    let mut options = Vec::new();
    let mut value_map = ValueMap::default();

    for attribute in attributes.iter().filter(|a| a.variation) {
        let option_index = options.len();

        let option_values: Vec<DestinationOptionValue> = attribute
            .options
            .iter()
            .enumerate()
            .map(|(i, label)| DestinationOptionValue {
                label: label.clone(),
                sort_order: i as i32,
            })
            .collect();

        let values: HashMap<String, usize> = attribute
            .options
            .iter()
            .enumerate()
            .map(|(i, label)| (normalize(label), i))
            .collect();

        value_map.insert(
            &attribute.name,
            OptionSlot {
                option_index,
                values,
            },
        );

        options.push(DestinationOption {
            display_name: attribute.name.clone(),
            display_type: option_display_type(&attribute.name),
            sort_order: option_index as i32,
            option_values,
        });
    }

    OptionSet { options, value_map }
}

/// Result of transforming a single variation
#[derive(Debug, Clone)]
pub struct VariantOutcome {
    pub variant: DestinationVariant,
    pub warnings: Vec<TransformWarning>,
}

/// Transforms one source variation into a destination variant
///
/// Attributes that don't resolve in the value map are dropped from the
/// variant with a warning; this function never fails outright. A blank
/// or zero variation weight becomes 0 without a warning, unlike the
/// parent-product default.
pub fn transform_variation(
    variation: &SourceVariation,
    value_map: &ValueMap,
    parent_sku: &str,
) -> VariantOutcome {
    let mut warnings = Vec::new();

    let sku = if variation.sku.trim().is_empty() {
        format!("{parent_sku}-var-{}", variation.id)
    } else {
        variation.sku.clone()
    };

    let price = parse_amount(&variation.price);
    let sale = parse_amount(&variation.sale_price);
    let sale_price = (sale > 0.0).then_some(sale);

    let out_of_stock = variation.stock_status == "outofstock";
    let purchasing_disabled = !variation.purchasable || out_of_stock;
    let purchasing_disabled_message =
        out_of_stock.then(|| "This item is out of stock".to_string());

    let mut option_values = Vec::new();
    for attribute in &variation.attributes {
        match value_map.resolve(&attribute.name, &attribute.option) {
            Some(pair) => option_values.push(pair),
            None => warnings.push(TransformWarning::AttributeNotFound {
                variation_id: variation.id,
                attribute: attribute.name.clone(),
            }),
        }
    }

    VariantOutcome {
        variant: DestinationVariant {
            sku,
            price,
            sale_price,
            weight: parse_amount(&variation.weight),
            purchasing_disabled,
            purchasing_disabled_message,
            option_values,
        },
        warnings,
    }
}

/// Options and variants produced for one variable product
#[derive(Debug, Clone)]
pub struct VariationSet {
    pub options: Vec<DestinationOption>,
    pub variants: Vec<DestinationVariant>,
    pub warnings: Vec<TransformWarning>,
}

/// Transforms a product's variations against its attributes
///
/// Empty results signal the caller to fall back to the simple-product
/// path: zero variation attributes yields empty options and variants,
/// and an empty variations list yields empty variants (the options may
/// still be non-empty). Variant lists longer than the destination limit
/// are truncated in stable source order with a warning.
pub fn transform_variations(
    product_id: u64,
    variations: &[SourceVariation],
    attributes: &[SourceAttribute],
    parent_sku: &str,
) -> VariationSet {
    let OptionSet { options, value_map } = options_from_attributes(attributes);

    if options.is_empty() {
        return VariationSet {
            options,
            variants: Vec::new(),
            warnings: vec![TransformWarning::NoVariationAttributes { product_id }],
        };
    }

    if variations.is_empty() {
        return VariationSet {
            options,
            variants: Vec::new(),
            warnings: vec![TransformWarning::NoVariations { product_id }],
        };
    }

    let mut variants = Vec::with_capacity(variations.len());
    let mut warnings = Vec::new();

    for variation in variations {
        let outcome = transform_variation(variation, &value_map, parent_sku);
        variants.push(outcome.variant);
        warnings.extend(outcome.warnings);
    }

    if variants.len() > MAX_VARIANTS_PER_PRODUCT {
        warnings.push(TransformWarning::VariantLimitExceeded {
            product_id,
            produced: variants.len(),
        });
        variants.truncate(MAX_VARIANTS_PER_PRODUCT);
    }

    VariationSet {
        options,
        variants,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn color_size_attributes() -> Vec<SourceAttribute> {
        vec![
            SourceAttribute {
                name: "Color".to_string(),
                options: vec!["Red".to_string(), "Blue".to_string()],
                variation: true,
            },
            SourceAttribute {
                name: "Size".to_string(),
                options: vec!["S".to_string(), "M".to_string(), "L".to_string()],
                variation: true,
            },
            SourceAttribute {
                name: "Brand".to_string(),
                options: vec!["Acme".to_string()],
                variation: false,
            },
        ]
    }

    fn variation(id: u64, color: &str, size: &str) -> SourceVariation {
        SourceVariation {
            id,
            price: "10.00".to_string(),
            stock_status: "instock".to_string(),
            attributes: vec![
                SourceVariationAttribute {
                    name: "Color".to_string(),
                    option: color.to_string(),
                },
                SourceVariationAttribute {
                    name: "Size".to_string(),
                    option: size.to_string(),
                },
            ],
            ..Default::default()
        }
    }

    use crate::domain::source::SourceVariationAttribute;

    #[test_case("Color", OptionDisplayType::Swatch; "color is swatch")]
    #[test_case("Shirt Colour", OptionDisplayType::Swatch; "british colour is swatch")]
    #[test_case("Size", OptionDisplayType::Rectangles; "size is rectangles")]
    #[test_case("Shoe size (EU)", OptionDisplayType::Rectangles; "size substring is rectangles")]
    #[test_case("Material", OptionDisplayType::Dropdown; "anything else is dropdown")]
    fn test_option_display_type(name: &str, expected: OptionDisplayType) {
        assert_eq!(option_display_type(name), expected);
    }

    #[test]
    fn test_options_filter_to_variation_attributes() {
        let set = options_from_attributes(&color_size_attributes());

        // Brand is not variation-participating
        assert_eq!(set.options.len(), 2);
        assert_eq!(set.options[0].display_name, "Color");
        assert_eq!(set.options[1].display_name, "Size");
        assert_eq!(set.options[1].sort_order, 1);
    }

    #[test]
    fn test_value_order_is_preserved_and_indexed() {
        let set = options_from_attributes(&color_size_attributes());

        let labels: Vec<&str> = set.options[1]
            .option_values
            .iter()
            .map(|v| v.label.as_str())
            .collect();
        assert_eq!(labels, vec!["S", "M", "L"]);

        let pair = set.value_map.resolve("size", "M").unwrap();
        assert_eq!(pair.option_index, 1);
        assert_eq!(pair.value_index, 1);
    }

    #[test]
    fn test_value_map_resolution_is_case_insensitive() {
        let set = options_from_attributes(&color_size_attributes());
        let pair = set.value_map.resolve(" COLOR ", "blue").unwrap();
        assert_eq!(pair.option_index, 0);
        assert_eq!(pair.value_index, 1);
    }

    #[test]
    fn test_variation_sku_fallback() {
        let set = options_from_attributes(&color_size_attributes());
        let mut source = variation(55, "Red", "S");
        source.sku = String::new();

        let outcome = transform_variation(&source, &set.value_map, "wc-9");
        assert_eq!(outcome.variant.sku, "wc-9-var-55");
    }

    #[test]
    fn test_variation_keeps_own_sku() {
        let set = options_from_attributes(&color_size_attributes());
        let mut source = variation(55, "Red", "S");
        source.sku = "RED-S".to_string();

        let outcome = transform_variation(&source, &set.value_map, "wc-9");
        assert_eq!(outcome.variant.sku, "RED-S");
    }

    #[test]
    fn test_out_of_stock_disables_purchasing_with_message() {
        let set = options_from_attributes(&color_size_attributes());
        let mut source = variation(1, "Red", "S");
        source.stock_status = "outofstock".to_string();

        let outcome = transform_variation(&source, &set.value_map, "wc-1");
        assert!(outcome.variant.purchasing_disabled);
        assert!(outcome
            .variant
            .purchasing_disabled_message
            .unwrap()
            .contains("out of stock"));
    }

    #[test]
    fn test_non_purchasable_disables_without_stock_message() {
        let set = options_from_attributes(&color_size_attributes());
        let mut source = variation(1, "Red", "S");
        source.purchasable = false;

        let outcome = transform_variation(&source, &set.value_map, "wc-1");
        assert!(outcome.variant.purchasing_disabled);
        assert!(outcome.variant.purchasing_disabled_message.is_none());
    }

    #[test]
    fn test_blank_variation_weight_is_zero_without_warning() {
        let set = options_from_attributes(&color_size_attributes());
        let source = variation(1, "Red", "S");

        let outcome = transform_variation(&source, &set.value_map, "wc-1");
        assert_eq!(outcome.variant.weight, 0.0);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_unresolved_attribute_is_dropped_with_warning() {
        let set = options_from_attributes(&color_size_attributes());
        let mut source = variation(8, "Red", "S");
        source.attributes.push(SourceVariationAttribute {
            name: "Material".to_string(),
            option: "Cotton".to_string(),
        });

        let outcome = transform_variation(&source, &set.value_map, "wc-1");
        assert_eq!(outcome.variant.option_values.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].to_string().contains("not found"));
    }

    #[test]
    fn test_sale_price_only_when_non_zero() {
        let set = options_from_attributes(&color_size_attributes());
        let mut source = variation(1, "Red", "S");
        source.sale_price = "0".to_string();
        let outcome = transform_variation(&source, &set.value_map, "wc-1");
        assert!(outcome.variant.sale_price.is_none());

        source.sale_price = "7.50".to_string();
        let outcome = transform_variation(&source, &set.value_map, "wc-1");
        assert_eq!(outcome.variant.sale_price, Some(7.50));
    }

    #[test]
    fn test_no_variation_attributes_yields_empty_set() {
        let attributes = vec![SourceAttribute {
            name: "Brand".to_string(),
            options: vec!["Acme".to_string()],
            variation: false,
        }];

        let set = transform_variations(3, &[variation(1, "Red", "S")], &attributes, "wc-3");
        assert!(set.options.is_empty());
        assert!(set.variants.is_empty());
        assert_eq!(set.warnings.len(), 1);
        assert!(set.warnings[0]
            .to_string()
            .contains("No variation attributes found"));
    }

    #[test]
    fn test_empty_variations_keeps_options() {
        let set = transform_variations(3, &[], &color_size_attributes(), "wc-3");
        assert_eq!(set.options.len(), 2);
        assert!(set.variants.is_empty());
        assert!(set.warnings[0].to_string().contains("no variations"));
    }

    #[test]
    fn test_variant_ceiling_truncates_in_stable_order() {
        let variations: Vec<SourceVariation> = (0..=MAX_VARIANTS_PER_PRODUCT as u64)
            .map(|i| variation(i, "Red", "S"))
            .collect();
        assert_eq!(variations.len(), 601);

        let set = transform_variations(3, &variations, &color_size_attributes(), "wc-3");
        assert_eq!(set.variants.len(), MAX_VARIANTS_PER_PRODUCT);
        // Stable order: the first source variation is still first
        assert_eq!(set.variants[0].sku, "wc-3-var-0");
        assert_eq!(set.variants.last().unwrap().sku, "wc-3-var-599");
        assert!(set.warnings.iter().any(|w| w.to_string().contains("600")));
    }
}
