//! Storage backend implementations.
//!
//! Concrete implementations of `catalog_core::storage::ItemStore`, selected at
//! start-up with `--store`:
//!
//! - `dynamodb` (default): AWS DynamoDB through `aws-sdk-dynamodb`
//! - `memory`: process-local tables, empty on every start

pub mod dynamodb;
pub mod inmemory;

pub use dynamodb::DynamoDbStore;
pub use inmemory::InMemoryStore;
