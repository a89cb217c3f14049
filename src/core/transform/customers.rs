//! Customer transformation
//!
//! Maps source customer accounts into destination customer-create
//! payloads. The email address is load-bearing: it identifies the
//! customer on both platforms and doubles as the idempotency marker, so
//! a customer without one is rejected outright.

use crate::domain::{DestinationCustomer, SourceCustomer, TransformWarning};

/// A customer the transformer refused to process
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRejection {
    pub source_id: u64,
    pub errors: Vec<String>,
}

/// A transformed customer plus its warnings
#[derive(Debug, Clone)]
pub struct TransformedCustomer {
    pub source_id: u64,
    pub customer: DestinationCustomer,
    pub warnings: Vec<TransformWarning>,
}

/// Deterministic destination-side identity for a source customer
///
/// Lowercased so lookups agree regardless of how the source stored the
/// address.
pub fn customer_external_id(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Transforms a source customer into a destination-create payload
///
/// # Errors
///
/// Returns a rejection when the customer has no email address.
pub fn transform_customer(
    customer: &SourceCustomer,
) -> Result<TransformedCustomer, CustomerRejection> {
    if customer.email.trim().is_empty() {
        return Err(CustomerRejection {
            source_id: customer.id,
            errors: vec!["Customer email is required".to_string()],
        });
    }

    let mut warnings = Vec::new();

    // Name fallback chain: account name, then billing name, then the
    // login name.
    let (first_name, last_name) = if !customer.first_name.trim().is_empty()
        || !customer.last_name.trim().is_empty()
    {
        (customer.first_name.clone(), customer.last_name.clone())
    } else if !customer.billing.first_name.trim().is_empty()
        || !customer.billing.last_name.trim().is_empty()
    {
        (
            customer.billing.first_name.clone(),
            customer.billing.last_name.clone(),
        )
    } else {
        warnings.push(TransformWarning::CustomerNameMissing {
            customer_id: customer.id,
        });
        (customer.username.clone(), String::new())
    };

    Ok(TransformedCustomer {
        source_id: customer.id,
        customer: DestinationCustomer {
            email: customer_external_id(&customer.email),
            first_name,
            last_name,
            company: customer.billing.company.clone(),
            phone: customer.billing.phone.clone(),
        },
        warnings,
    })
}
