use rust_decimal::Decimal;

use crate::item::keys::{PRODUCT_NAME_LOWER, PRODUCT_OWNER_ID};
use crate::storage::{Filter, Query};

use super::error::ProductError;
use super::types::Product;

/// Validates a product before it is written.
pub fn validate_product(product: &Product) -> Result<(), ProductError> {
    if product.id.trim().is_empty() {
        return Err(ProductError::MissingId);
    }
    if product.name.trim().is_empty() {
        return Err(ProductError::EmptyName);
    }
    if product.name.chars().count() > 200 {
        return Err(ProductError::NameTooLong);
    }
    // The owner id is the index partition key; the store rejects empty key values.
    if product.owner_id.trim().is_empty() {
        return Err(ProductError::MissingOwner);
    }
    if product.price < Decimal::ZERO {
        return Err(ProductError::NegativePrice);
    }
    // Stored prices carry exactly two decimals.
    if product.price.normalize().scale() > 2 {
        return Err(ProductError::TooManyDecimals);
    }
    Ok(())
}

/// Lowercases a name search term. An empty term means no filter; spaces are
/// part of the substring.
pub fn normalize_name_filter(name: Option<&str>) -> Option<String> {
    name.filter(|term| !term.is_empty()).map(str::to_lowercase)
}

/// Builds the owner-partition query, with an optional case-insensitive name filter.
pub fn owner_query(
    table: &str,
    owner_index: &str,
    owner_id: &str,
    name: Option<&str>,
) -> Query {
    Query {
        table: table.to_string(),
        index: Some(owner_index.to_string()),
        partition_attribute: PRODUCT_OWNER_ID.to_string(),
        partition_value: owner_id.to_string(),
        filter: normalize_name_filter(name).map(|term| Filter::Contains {
            attribute: PRODUCT_NAME_LOWER.to_string(),
            value: term,
        }),
    }
}
