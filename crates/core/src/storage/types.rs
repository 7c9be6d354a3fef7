use crate::item::{AttributeValue, Item};

/// Name of the numeric attribute that carries an item's optimistic-lock version.
///
/// Items written before versioning existed have no such attribute and are
/// treated as version 0.
pub const VERSION_ATTRIBUTE: &str = "Version";

/// Primary key of a single item.
///
/// Every table this server touches is keyed by one string attribute, so a key
/// is the attribute name plus its value. The entity type only labels errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub entity_type: &'static str,
    pub attribute: &'static str,
    pub value: String,
}

impl Key {
    pub fn new(entity_type: &'static str, attribute: &'static str, value: impl Into<String>) -> Self {
        Self {
            entity_type,
            attribute,
            value: value.into(),
        }
    }

    /// The key as a one-attribute item, the shape stores use for continuation tokens.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(
            self.attribute.to_string(),
            AttributeValue::S(self.value.clone()),
        );
        item
    }
}

/// Condition a put must satisfy against the currently stored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutCondition {
    /// Unconditional overwrite.
    Always,
    /// No item with this key may exist yet.
    NotExists,
    /// The stored item must carry exactly this version.
    ///
    /// Version 0 means "exists but was never versioned".
    VersionEquals(u64),
}

/// Post-read filter applied by the store to every item of a query page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// The string attribute contains `value` as a substring.
    Contains { attribute: String, value: String },
}

impl Filter {
    /// Evaluates the filter against an item the way the store does.
    ///
    /// Missing attributes and non-string values never match.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Filter::Contains { attribute, value } => match item.get(attribute) {
                Some(AttributeValue::S(s)) => s.contains(value.as_str()),
                _ => false,
            },
        }
    }
}

/// A query restricted to a single partition, optionally through a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub table: String,
    pub index: Option<String>,
    pub partition_attribute: String,
    pub partition_value: String,
    pub filter: Option<Filter>,
}

/// One bounded page of query results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items that passed the filter. May be empty even when more pages follow.
    pub items: Vec<Item>,
    /// Opaque continuation token; `None` once the partition is exhausted.
    pub last_evaluated_key: Option<Item>,
}

impl Page {
    /// Returns true if the store reported no further continuation.
    pub fn is_last(&self) -> bool {
        self.last_evaluated_key
            .as_ref()
            .is_none_or(|key| key.is_empty())
    }
}
