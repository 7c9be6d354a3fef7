//! Shared application state.
//!
//! Cloned for each request handler. Holds the catalog service, which owns the
//! store client, and the configuration the router was built from.

use std::sync::Arc;

use catalog_core::storage::ItemStore;

use crate::config::Config;
use crate::service::{CatalogService, Tables};
use crate::storage::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CatalogService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state backed by the given store.
    pub fn new(store: Arc<dyn ItemStore>, config: Config) -> Self {
        let service = CatalogService::new(store, Tables::from(&config));
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    /// Empty in-memory store with default configuration.
    fn default() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), Config::default())
    }
}
