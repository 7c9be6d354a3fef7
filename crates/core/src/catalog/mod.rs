mod error;
mod operations;
mod requests;
mod types;

pub use error::ProductError;
pub use operations::{normalize_name_filter, owner_query, validate_product};
pub use requests::{LoginRequest, ProductPayload};
pub use types::{LoginOutcome, Product, User};
