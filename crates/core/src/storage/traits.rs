use async_trait::async_trait;

use crate::item::{AttributeValue, Item};

use super::{Key, Page, PutCondition, Query, Result};

/// A wide-column item store addressed by primary key.
///
/// Implementations translate condition failures into typed errors:
/// a failed [`PutCondition::NotExists`] is `AlreadyExists`, a failed
/// [`PutCondition::VersionEquals`] is `Conflict` (or `NotFound` when the item
/// is gone), and operations on a missing item are `NotFound`.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Gets an item by its primary key.
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>>;

    /// Writes a full item, replacing whatever is stored under `key`.
    async fn put_item(
        &self,
        table: &str,
        key: &Key,
        item: Item,
        condition: PutCondition,
    ) -> Result<()>;

    /// Sets one attribute on an existing item, leaving the others untouched.
    async fn set_attribute(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()>;

    /// Removes an existing item.
    async fn delete_item(&self, table: &str, key: &Key) -> Result<()>;

    /// Fetches one page of a partition query, resuming after `exclusive_start_key`.
    async fn query_page(&self, query: &Query, exclusive_start_key: Option<Item>) -> Result<Page>;

    /// Verifies the table is reachable.
    async fn check_table(&self, table: &str) -> Result<()>;
}
