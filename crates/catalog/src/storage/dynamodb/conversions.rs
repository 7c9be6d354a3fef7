//! DynamoDB attribute and expression conversions.
//!
//! Pure functions for translating between `catalog_core` items and SDK
//! attribute maps, and for rendering put conditions as condition expressions.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use catalog_core::item::{AttributeValue, Item};
use catalog_core::storage::{Filter, Key, PutCondition, RepositoryError, VERSION_ATTRIBUTE};

pub type SdkItem = HashMap<String, SdkValue>;

// ============================================================================
// Attribute conversions
// ============================================================================

pub fn to_sdk_value(value: AttributeValue) -> SdkValue {
    match value {
        AttributeValue::S(s) => SdkValue::S(s),
        AttributeValue::N(n) => SdkValue::N(n),
        AttributeValue::Bool(b) => SdkValue::Bool(b),
    }
}

/// Converts an SDK value. Sets, lists, maps, binary and null are not part of
/// the catalog model and are rejected.
pub fn from_sdk_value(name: &str, value: SdkValue) -> Result<AttributeValue, RepositoryError> {
    match value {
        SdkValue::S(s) => Ok(AttributeValue::S(s)),
        SdkValue::N(n) => Ok(AttributeValue::N(n)),
        SdkValue::Bool(b) => Ok(AttributeValue::Bool(b)),
        other => Err(RepositoryError::InvalidData(format!(
            "Field {name} has unsupported type: {other:?}"
        ))),
    }
}

pub fn to_sdk_item(item: Item) -> SdkItem {
    item.into_iter()
        .map(|(name, value)| (name, to_sdk_value(value)))
        .collect()
}

pub fn from_sdk_item(item: SdkItem) -> Result<Item, RepositoryError> {
    item.into_iter()
        .map(|(name, value)| {
            let value = from_sdk_value(&name, value)?;
            Ok((name, value))
        })
        .collect()
}

pub fn key_to_sdk(key: &Key) -> SdkItem {
    to_sdk_item(key.to_item())
}

// ============================================================================
// Expressions
// ============================================================================

/// A rendered DynamoDB expression with its placeholder bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: SdkItem,
}

/// Renders a put condition. `Always` has no expression.
pub fn condition_expression(key: &Key, condition: PutCondition) -> Option<Expression> {
    let mut expr = Expression::default();

    match condition {
        PutCondition::Always => return None,
        PutCondition::NotExists => {
            expr.expression = "attribute_not_exists(#pk)".to_string();
            expr.names.insert("#pk".to_string(), key.attribute.to_string());
        }
        // Unversioned items predate the attribute; they must exist and still lack it.
        PutCondition::VersionEquals(0) => {
            expr.expression = "attribute_exists(#pk) AND attribute_not_exists(#ver)".to_string();
            expr.names.insert("#pk".to_string(), key.attribute.to_string());
            expr.names
                .insert("#ver".to_string(), VERSION_ATTRIBUTE.to_string());
        }
        PutCondition::VersionEquals(version) => {
            expr.expression = "#ver = :ver".to_string();
            expr.names
                .insert("#ver".to_string(), VERSION_ATTRIBUTE.to_string());
            expr.values
                .insert(":ver".to_string(), SdkValue::N(version.to_string()));
        }
    }

    Some(expr)
}

/// Renders the key condition of a single-partition query.
pub fn key_condition(partition_attribute: &str, partition_value: &str) -> Expression {
    let mut expr = Expression {
        expression: "#pk = :pk".to_string(),
        ..Expression::default()
    };
    expr.names
        .insert("#pk".to_string(), partition_attribute.to_string());
    expr.values
        .insert(":pk".to_string(), SdkValue::S(partition_value.to_string()));
    expr
}

/// Renders a post-read filter. Placeholders do not collide with [`key_condition`].
pub fn filter_expression(filter: &Filter) -> Expression {
    match filter {
        Filter::Contains { attribute, value } => {
            let mut expr = Expression {
                expression: "contains(#f0, :f0)".to_string(),
                ..Expression::default()
            };
            expr.names.insert("#f0".to_string(), attribute.clone());
            expr.values
                .insert(":f0".to_string(), SdkValue::S(value.clone()));
            expr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Key {
        Key::new("Product", "id", "p-1")
    }

    #[test]
    fn test_item_round_trip() {
        let mut item = Item::new();
        item.insert("id".to_string(), AttributeValue::S("p-1".to_string()));
        item.insert("Version".to_string(), AttributeValue::N("2".to_string()));
        item.insert("Active".to_string(), AttributeValue::Bool(true));

        let sdk = to_sdk_item(item.clone());
        assert_eq!(sdk.get("id"), Some(&SdkValue::S("p-1".to_string())));
        assert_eq!(sdk.get("Version"), Some(&SdkValue::N("2".to_string())));

        assert_eq!(from_sdk_item(sdk).unwrap(), item);
    }

    #[test]
    fn test_unsupported_types_are_rejected() {
        let mut sdk = SdkItem::new();
        sdk.insert("Tags".to_string(), SdkValue::Ss(vec!["a".to_string()]));

        let err = from_sdk_item(sdk).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidData(msg) if msg.contains("Tags")));
    }

    #[test]
    fn test_key_to_sdk() {
        let sdk = key_to_sdk(&key());
        assert_eq!(sdk.len(), 1);
        assert_eq!(sdk.get("id"), Some(&SdkValue::S("p-1".to_string())));
    }

    #[test]
    fn test_always_has_no_condition() {
        assert_eq!(condition_expression(&key(), PutCondition::Always), None);
    }

    #[test]
    fn test_not_exists_condition() {
        let expr = condition_expression(&key(), PutCondition::NotExists).unwrap();

        assert_eq!(expr.expression, "attribute_not_exists(#pk)");
        assert_eq!(expr.names.get("#pk").map(String::as_str), Some("id"));
        assert!(expr.values.is_empty());
    }

    #[test]
    fn test_unversioned_condition() {
        let expr = condition_expression(&key(), PutCondition::VersionEquals(0)).unwrap();

        assert_eq!(
            expr.expression,
            "attribute_exists(#pk) AND attribute_not_exists(#ver)"
        );
        assert_eq!(expr.names.get("#ver").map(String::as_str), Some("Version"));
        assert!(expr.values.is_empty());
    }

    #[test]
    fn test_version_condition() {
        let expr = condition_expression(&key(), PutCondition::VersionEquals(3)).unwrap();

        assert_eq!(expr.expression, "#ver = :ver");
        assert_eq!(expr.values.get(":ver"), Some(&SdkValue::N("3".to_string())));
        assert!(!expr.names.contains_key("#pk"));
    }

    #[test]
    fn test_query_expressions_do_not_collide() {
        let key = key_condition("OwnerId", "o-1");
        let filter = filter_expression(&Filter::Contains {
            attribute: "ProductNameLower".to_string(),
            value: "shoe".to_string(),
        });

        assert_eq!(key.expression, "#pk = :pk");
        assert_eq!(filter.expression, "contains(#f0, :f0)");
        assert!(key.names.keys().all(|k| !filter.names.contains_key(k)));
        assert!(key.values.keys().all(|k| !filter.values.contains_key(k)));
    }
}
