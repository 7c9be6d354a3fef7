//! Error types for DynamoDB operations.

use catalog_core::auth::PasswordError;
use catalog_core::storage::RepositoryError;
use thiserror::Error;

/// Result type alias for dynamodb module.
pub type Result<T> = std::result::Result<T, DynamodbError>;

/// Errors that can occur during DynamoDB operations.
#[derive(Error, Debug)]
pub enum DynamodbError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Table '{table_name}' not found")]
    TableNotFound { table_name: String },

    #[error("User '{user_id}' already exists (use --overwrite to replace it)")]
    UserExists { user_id: String },

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Timeout waiting for table to become active")]
    TableActivationTimeout,

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),

    #[error("Invalid user: {0}")]
    InvalidUser(#[from] RepositoryError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}
