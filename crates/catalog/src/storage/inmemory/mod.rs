//! In-memory storage backend.
//!
//! Stores every table as a `BTreeMap` behind an `Arc<RwLock<_>>`. Conditions
//! are checked under the write lock, and queries page through results the way
//! DynamoDB does, which makes it suitable for tests and local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! ```

mod repository;

pub use repository::InMemoryStore;
