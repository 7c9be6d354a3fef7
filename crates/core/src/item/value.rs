use std::collections::HashMap;

use crate::storage::RepositoryError;

/// A single stored attribute, tagged with its store-level scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, carried as canonical decimal text the way the store transmits it.
    N(String),
    /// Boolean.
    Bool(bool),
}

impl AttributeValue {
    /// Returns the string value, if this is a string attribute.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// Short type descriptor used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::Bool(_) => "BOOL",
        }
    }
}

/// A stored item: attribute name to tagged value, in no particular order.
pub type Item = HashMap<String, AttributeValue>;

/// Reads a string attribute that may be absent.
///
/// A present attribute with any tag other than `S` is an error.
pub(crate) fn get_optional_string(
    item: &Item,
    key: &str,
) -> Result<Option<String>, RepositoryError> {
    match item.get(key) {
        None => Ok(None),
        Some(AttributeValue::S(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(key, "S", other)),
    }
}

/// Reads a required string attribute.
pub(crate) fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    get_optional_string(item, key)?
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing field: {key}")))
}

pub(crate) fn wrong_type(key: &str, expected: &str, found: &AttributeValue) -> RepositoryError {
    RepositoryError::InvalidData(format!(
        "Field {key} has type {}, expected {expected}",
        found.type_name()
    ))
}
