//! Order transformation
//!
//! Maps source orders into destination order-create payloads. Statuses
//! resolve through a fixed table with a pending fallback, addresses are
//! filled with documented defaults, unresolved line items degrade to
//! custom items, and totals come from the source order's own aggregate
//! fields rather than line-item sums (re-deriving them invites rounding
//! drift).

use crate::core::transform::{parse_amount, round_cents};
use crate::domain::destination::{DestinationAddress, DestinationLineItem, DestinationOrder};
use crate::domain::mapping::IdMap;
use crate::domain::source::{SourceAddress, SourceOrder};
use crate::domain::warning::TransformWarning;

/// Name recorded on the destination as the origin of migrated orders
const EXTERNAL_SOURCE: &str = "woocommerce";

/// Placeholder first name for blank billing names (guest checkouts)
const GUEST_FIRST_NAME: &str = "Guest";

/// Placeholder last name for blank billing names
const GUEST_LAST_NAME: &str = "Customer";

/// Country code assumed when the source address carries none
const DEFAULT_COUNTRY_ISO: &str = "US";

/// A destination order status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStatus {
    pub id: u64,
    pub name: &'static str,
}

/// Fallback entry for unrecognized source statuses
const STATUS_PENDING: OrderStatus = OrderStatus {
    id: 1,
    name: "Pending",
};

/// Resolves a source order status through the fixed status table
///
/// Unknown source statuses fall back to the table's pending entry; this
/// is never an error.
pub fn map_order_status(source_status: &str) -> OrderStatus {
    match source_status.to_lowercase().as_str() {
        "pending" => STATUS_PENDING,
        "processing" => OrderStatus {
            id: 11,
            name: "Awaiting Fulfillment",
        },
        "on-hold" => OrderStatus {
            id: 7,
            name: "Awaiting Payment",
        },
        "completed" => OrderStatus {
            id: 10,
            name: "Completed",
        },
        "cancelled" => OrderStatus {
            id: 5,
            name: "Cancelled",
        },
        "refunded" => OrderStatus {
            id: 4,
            name: "Refunded",
        },
        "failed" => OrderStatus {
            id: 6,
            name: "Declined",
        },
        _ => STATUS_PENDING,
    }
}

/// Expands an ISO 3166-1 alpha-2 code to a country name
///
/// Unknown codes pass through unchanged; the destination accepts either.
pub fn country_name(iso: &str) -> String {
    match iso.to_uppercase().as_str() {
        "US" => "United States".to_string(),
        "CA" => "Canada".to_string(),
        "GB" => "United Kingdom".to_string(),
        "AU" => "Australia".to_string(),
        "NZ" => "New Zealand".to_string(),
        "DE" => "Germany".to_string(),
        "FR" => "France".to_string(),
        "ES" => "Spain".to_string(),
        "IT" => "Italy".to_string(),
        "NL" => "Netherlands".to_string(),
        "IE" => "Ireland".to_string(),
        "JP" => "Japan".to_string(),
        _ => iso.to_string(),
    }
}

/// Deterministic idempotency marker for a source order
///
/// Embedded in the destination payload's `external_id`; the runner's
/// idempotency check looks this value up before writing.
pub fn order_external_id(source_order_id: u64) -> String {
    format!("wc-order-{source_order_id}")
}

/// Fills a destination address from a source address, defaulting the
/// fields the destination requires
pub fn transform_address(address: &SourceAddress) -> DestinationAddress {
    let first_name = if address.first_name.trim().is_empty() {
        GUEST_FIRST_NAME.to_string()
    } else {
        address.first_name.clone()
    };
    let last_name = if address.last_name.trim().is_empty() {
        GUEST_LAST_NAME.to_string()
    } else {
        address.last_name.clone()
    };

    let iso = if address.country.trim().is_empty() {
        DEFAULT_COUNTRY_ISO.to_string()
    } else {
        address.country.trim().to_uppercase()
    };

    DestinationAddress {
        first_name,
        last_name,
        company: address.company.clone(),
        street_1: address.address_1.clone(),
        street_2: address.address_2.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        zip: address.postcode.clone(),
        country: country_name(&iso),
        country_iso2: iso,
        email: address.email.clone(),
        phone: address.phone.clone(),
    }
}

/// Previously built id mappings an order transform resolves against
#[derive(Debug, Clone, Copy)]
pub struct OrderContext<'a> {
    pub product_map: &'a IdMap,
    pub customer_map: &'a IdMap,
}

/// A transformed order plus its warnings
#[derive(Debug, Clone)]
pub struct TransformedOrder {
    pub source_id: u64,
    pub order: DestinationOrder,
    pub warnings: Vec<TransformWarning>,
}

/// Transforms a source order into a destination order-create payload
///
/// Order transformation never fails: unknown statuses fall back to
/// pending, blank addresses are defaulted, and line items whose product
/// has no id mapping are included as custom items with a warning.
pub fn transform_order(order: &SourceOrder, ctx: &OrderContext<'_>) -> TransformedOrder {
    let mut warnings = Vec::new();

    let status = map_order_status(&order.status);
    let customer_id = ctx.customer_map.get(order.customer_id).unwrap_or(0);

    let billing_address = transform_address(&order.billing);
    // A shipping address without a street line carries nothing usable;
    // fall back to billing.
    let shipping_address = if order.shipping.has_street() {
        transform_address(&order.shipping)
    } else {
        billing_address.clone()
    };

    let mut products = Vec::with_capacity(order.line_items.len());
    for item in &order.line_items {
        let quantity = item.quantity.max(1);
        let line_total = parse_amount(&item.total);
        let line_tax = parse_amount(&item.total_tax);

        let product_id = ctx.product_map.get(item.product_id);
        if product_id.is_none() {
            warnings.push(TransformWarning::UnmappedLineItemProduct {
                order_id: order.id,
                product_id: item.product_id,
            });
        }

        products.push(DestinationLineItem {
            product_id,
            name: item.name.clone(),
            quantity,
            price_inc_tax: round_cents(line_total / quantity as f64),
            price_ex_tax: round_cents((line_total - line_tax) / quantity as f64),
        });
    }

    // Totals come from the order's own aggregates; refunds never alter
    // them.
    let total_inc_tax = parse_amount(&order.total);
    let total_tax = parse_amount(&order.total_tax);
    let shipping_cost_ex_tax = parse_amount(&order.shipping_total);
    let shipping_tax = parse_amount(&order.shipping_tax);
    let shipping_cost_inc_tax = shipping_cost_ex_tax + shipping_tax;
    let subtotal_inc_tax = total_inc_tax - shipping_cost_inc_tax;
    let subtotal_ex_tax = subtotal_inc_tax - (total_tax - shipping_tax);

    let staff_notes = refund_note(order);
    let customer_message = if order.customer_note.trim().is_empty() {
        None
    } else {
        Some(order.customer_note.clone())
    };

    TransformedOrder {
        source_id: order.id,
        order: DestinationOrder {
            status_id: status.id,
            customer_id,
            billing_address,
            shipping_addresses: vec![shipping_address],
            products,
            subtotal_ex_tax: round_cents(subtotal_ex_tax),
            subtotal_inc_tax: round_cents(subtotal_inc_tax),
            shipping_cost_ex_tax,
            shipping_cost_inc_tax: round_cents(shipping_cost_inc_tax),
            total_ex_tax: round_cents(total_inc_tax - total_tax),
            total_inc_tax,
            staff_notes,
            customer_message,
            external_id: order_external_id(order.id),
            external_source: EXTERNAL_SOURCE.to_string(),
        },
        warnings,
    }
}

/// Summarizes refund history into a textual note for the created order
fn refund_note(order: &SourceOrder) -> Option<String> {
    if order.refunds.is_empty() {
        return None;
    }

    let total: f64 = order.refunds.iter().map(|r| parse_amount(&r.total)).sum();
    let details: Vec<String> = order
        .refunds
        .iter()
        .map(|r| {
            if r.reason.trim().is_empty() {
                format!("#{}: {:.2}", r.id, parse_amount(&r.total))
            } else {
                format!("#{}: {:.2} ({})", r.id, parse_amount(&r.total), r.reason)
            }
        })
        .collect();

    Some(format!(
        "Refund history from source order: {} refund(s) totaling {:.2} - {}",
        order.refunds.len(),
        total,
        details.join("; ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source::{SourceLineItem, SourceRefund};
    use test_case::test_case;

    fn order(id: u64, status: &str) -> SourceOrder {
        SourceOrder {
            id,
            status: status.to_string(),
            customer_id: 0,
            total: "60.00".to_string(),
            total_tax: "5.00".to_string(),
            shipping_total: "8.00".to_string(),
            shipping_tax: "1.00".to_string(),
            billing: SourceAddress {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                address_1: "1 Analytical Way".to_string(),
                city: "London".to_string(),
                postcode: "N1".to_string(),
                country: "GB".to_string(),
                ..Default::default()
            },
            line_items: vec![SourceLineItem {
                id: 1,
                product_id: 100,
                name: "Widget".to_string(),
                quantity: 2,
                total: "51.00".to_string(),
                total_tax: "4.00".to_string(),
            }],
            ..Default::default()
        }
    }

    fn context_with_product(source_id: u64, destination_id: u64) -> (IdMap, IdMap) {
        let mut products = IdMap::new();
        products.insert(source_id, destination_id);
        (products, IdMap::new())
    }

    #[test_case("pending", 1; "pending")]
    #[test_case("processing", 11; "processing")]
    #[test_case("on-hold", 7; "on hold")]
    #[test_case("completed", 10; "completed")]
    #[test_case("cancelled", 5; "cancelled")]
    #[test_case("refunded", 4; "refunded")]
    #[test_case("failed", 6; "failed")]
    #[test_case("some-plugin-status", 1; "unknown falls back to pending")]
    fn test_status_table(source: &str, expected_id: u64) {
        assert_eq!(map_order_status(source).id, expected_id);
    }

    #[test]
    fn test_country_lookup_passes_unknown_through() {
        assert_eq!(country_name("GB"), "United Kingdom");
        assert_eq!(country_name("us"), "United States");
        assert_eq!(country_name("ZZ"), "ZZ");
    }

    #[test]
    fn test_address_defaults() {
        let blank = SourceAddress::default();
        let address = transform_address(&blank);

        assert_eq!(address.first_name, "Guest");
        assert_eq!(address.last_name, "Customer");
        assert_eq!(address.country_iso2, "US");
        assert_eq!(address.country, "United States");
    }

    #[test]
    fn test_shipping_falls_back_to_billing() {
        let (products, customers) = context_with_product(100, 900);
        let ctx = OrderContext {
            product_map: &products,
            customer_map: &customers,
        };

        // Shipping has no street line
        let result = transform_order(&order(1, "completed"), &ctx);
        assert_eq!(
            result.order.shipping_addresses[0],
            result.order.billing_address
        );

        let mut with_shipping = order(2, "completed");
        with_shipping.shipping = SourceAddress {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            address_1: "2 Harbor Rd".to_string(),
            country: "US".to_string(),
            ..Default::default()
        };
        let result = transform_order(&with_shipping, &ctx);
        assert_eq!(result.order.shipping_addresses[0].street_1, "2 Harbor Rd");
    }

    #[test]
    fn test_mapped_line_item_carries_destination_product_id() {
        let (products, customers) = context_with_product(100, 900);
        let ctx = OrderContext {
            product_map: &products,
            customer_map: &customers,
        };

        let result = transform_order(&order(1, "completed"), &ctx);
        assert_eq!(result.order.products[0].product_id, Some(900));
        assert!(result.warnings.is_empty());
        // 51.00 over 2 units, 4.00 of it tax
        assert_eq!(result.order.products[0].price_inc_tax, 25.50);
        assert_eq!(result.order.products[0].price_ex_tax, 23.50);
    }

    #[test]
    fn test_unmapped_line_item_becomes_custom_with_warning() {
        let products = IdMap::new();
        let customers = IdMap::new();
        let ctx = OrderContext {
            product_map: &products,
            customer_map: &customers,
        };

        let result = transform_order(&order(1, "completed"), &ctx);
        assert_eq!(result.order.products[0].product_id, None);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].to_string().contains("100"));
    }

    #[test]
    fn test_totals_come_from_aggregates() {
        let (products, customers) = context_with_product(100, 900);
        let ctx = OrderContext {
            product_map: &products,
            customer_map: &customers,
        };

        let result = transform_order(&order(1, "completed"), &ctx);
        let destination = &result.order;

        assert_eq!(destination.total_inc_tax, 60.00);
        assert_eq!(destination.total_ex_tax, 55.00);
        assert_eq!(destination.shipping_cost_ex_tax, 8.00);
        assert_eq!(destination.shipping_cost_inc_tax, 9.00);
        assert_eq!(destination.subtotal_inc_tax, 51.00);
        assert_eq!(destination.subtotal_ex_tax, 47.00);
    }

    #[test]
    fn test_refunds_summarized_without_touching_totals() {
        let (products, customers) = context_with_product(100, 900);
        let ctx = OrderContext {
            product_map: &products,
            customer_map: &customers,
        };

        let mut source = order(1, "completed");
        source.refunds = vec![
            SourceRefund {
                id: 11,
                total: "10.00".to_string(),
                reason: "damaged".to_string(),
            },
            SourceRefund {
                id: 12,
                total: "5.00".to_string(),
                reason: String::new(),
            },
        ];

        let result = transform_order(&source, &ctx);
        let note = result.order.staff_notes.unwrap();
        assert!(note.contains("2 refund(s)"));
        assert!(note.contains("15.00"));
        assert!(note.contains("damaged"));
        assert_eq!(result.order.total_inc_tax, 60.00);
    }

    #[test]
    fn test_external_id_is_deterministic() {
        assert_eq!(order_external_id(42), "wc-order-42");
        assert_eq!(order_external_id(42), order_external_id(42));
    }

    #[test]
    fn test_customer_resolution() {
        let products = IdMap::new();
        let mut customers = IdMap::new();
        customers.insert(7, 70);
        let ctx = OrderContext {
            product_map: &products,
            customer_map: &customers,
        };

        let mut source = order(1, "completed");
        source.customer_id = 7;
        let result = transform_order(&source, &ctx);
        assert_eq!(result.order.customer_id, 70);

        // Unmapped customer becomes a guest order
        source.customer_id = 8;
        let result = transform_order(&source, &ctx);
        assert_eq!(result.order.customer_id, 0);
    }
}
