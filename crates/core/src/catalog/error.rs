use thiserror::Error;

use crate::storage::RepositoryError;

/// Errors that can occur when validating a product.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("Product id is required")]
    MissingId,
    #[error("Product name cannot be empty")]
    EmptyName,
    #[error("Product name too long (max 200 characters)")]
    NameTooLong,
    #[error("Owner id is required")]
    MissingOwner,
    #[error("Price cannot be negative")]
    NegativePrice,
    #[error("Price cannot have more than two decimal places")]
    TooManyDecimals,
}

impl From<ProductError> for RepositoryError {
    fn from(err: ProductError) -> Self {
        RepositoryError::Validation(err.to_string())
    }
}
