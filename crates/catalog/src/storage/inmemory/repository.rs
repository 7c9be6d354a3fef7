//! In-memory item store implementation.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use catalog_core::item::{item_version, AttributeValue, Item};
use catalog_core::storage::{
    ItemStore, Key, Page, PutCondition, Query, RepositoryError, Result,
};

/// Default number of items a query examines per page.
const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Default)]
struct Table {
    /// Name of the primary key attribute, learned from the first write.
    key_attribute: Option<&'static str>,
    /// Items by primary key value. Ordered so continuation tokens are stable.
    items: BTreeMap<String, Item>,
}

/// In-memory item store for tests and local development.
///
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    page_size: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets how many partition items a single query page examines.
    ///
    /// Like DynamoDB's `Limit`, the bound applies before the filter, so a page
    /// may come back empty while still carrying a continuation key.
    #[cfg(test)]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

fn not_found(key: &Key) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: key.entity_type,
        id: key.value.clone(),
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|t| t.items.get(&key.value))
            .cloned())
    }

    async fn put_item(
        &self,
        table: &str,
        key: &Key,
        item: Item,
        condition: PutCondition,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        let existing = table.items.get(&key.value);

        match (condition, existing) {
            (PutCondition::Always, _) | (PutCondition::NotExists, None) => {}
            (PutCondition::NotExists, Some(_)) => {
                return Err(RepositoryError::AlreadyExists {
                    entity_type: key.entity_type,
                    id: key.value.clone(),
                });
            }
            (PutCondition::VersionEquals(_), None) => return Err(not_found(key)),
            (PutCondition::VersionEquals(expected), Some(current)) => {
                if item_version(current).ok() != Some(expected) {
                    return Err(RepositoryError::Conflict {
                        entity_type: key.entity_type,
                        id: key.value.clone(),
                    });
                }
            }
        }

        table.key_attribute.get_or_insert(key.attribute);
        table.items.insert(key.value.clone(), item);
        Ok(())
    }

    async fn set_attribute(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let item = tables
            .get_mut(table)
            .and_then(|t| t.items.get_mut(&key.value))
            .ok_or_else(|| not_found(key))?;

        item.insert(attribute.to_string(), value);
        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &Key) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .get_mut(table)
            .and_then(|t| t.items.remove(&key.value))
            .map(|_| ())
            .ok_or_else(|| not_found(key))
    }

    async fn query_page(&self, query: &Query, exclusive_start_key: Option<Item>) -> Result<Page> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(&query.table) else {
            return Ok(Page::default());
        };
        let Some(key_attribute) = table.key_attribute else {
            return Ok(Page::default());
        };

        let start = match exclusive_start_key.as_ref() {
            Some(start) => {
                let value = start
                    .get(key_attribute)
                    .and_then(AttributeValue::as_s)
                    .ok_or_else(|| {
                        RepositoryError::QueryFailed(format!(
                            "Invalid continuation key: missing {key_attribute}"
                        ))
                    })?;
                Bound::Excluded(value.to_string())
            }
            None => Bound::Unbounded,
        };

        let partition_value = AttributeValue::S(query.partition_value.clone());
        let mut candidates = table
            .items
            .range((start, Bound::Unbounded))
            .filter(|(_, item)| item.get(&query.partition_attribute) == Some(&partition_value))
            .peekable();

        let mut page = Page::default();
        let mut last_key = None;
        for (id, item) in candidates.by_ref().take(self.page_size) {
            last_key = Some(id.clone());
            if query.filter.as_ref().is_none_or(|f| f.matches(item)) {
                page.items.push(item.clone());
            }
        }

        if candidates.peek().is_some() {
            page.last_evaluated_key = last_key.map(|id| {
                let mut key = Item::new();
                key.insert(key_attribute.to_string(), AttributeValue::S(id));
                key
            });
        }

        Ok(page)
    }

    async fn check_table(&self, _table: &str) -> Result<()> {
        Ok(())
    }
}
