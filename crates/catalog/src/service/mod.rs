//! Catalog operations over an item store (Imperative Shell).
//!
//! Each operation reads and writes through `ItemStore`, using the pure codec
//! and validation functions from `catalog_core`. Read-then-write sequences are
//! guarded by the item's version attribute instead of in-process locks.

mod login;
mod products;

use std::sync::Arc;

use catalog_core::storage::ItemStore;

use crate::config::Config;

/// Names of the tables and indexes the service addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub products: String,
    pub users: String,
    pub owner_index: String,
}

impl From<&Config> for Tables {
    fn from(config: &Config) -> Self {
        Self {
            products: config.products_table.clone(),
            users: config.users_table.clone(),
            owner_index: config.owner_index.clone(),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// The catalog backend: product mutations, owner queries, and login.
pub struct CatalogService {
    store: Arc<dyn ItemStore>,
    tables: Tables,
}

impl CatalogService {
    pub fn new(store: Arc<dyn ItemStore>, tables: Tables) -> Self {
        Self { store, tables }
    }

    /// Verifies that both tables are reachable.
    pub async fn check_tables(&self) -> catalog_core::storage::Result<()> {
        self.store.check_table(&self.tables.products).await?;
        self.store.check_table(&self.tables.users).await
    }
}
