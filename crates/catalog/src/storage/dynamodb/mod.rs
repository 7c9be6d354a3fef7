//! DynamoDB storage backend.
//!
//! Implements the item store from `catalog_core::storage` using
//! `aws-sdk-dynamodb`. Product and user tables are each keyed by a single
//! string attribute; products carry a secondary index on `OwnerId`.

mod conversions;
mod error;
mod repository;

pub use repository::DynamoDbStore;
