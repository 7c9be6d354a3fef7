//! Password hashing and credential checks for the login flow.

mod error;
mod password;

pub use error::PasswordError;
pub use password::{credentials_match, hash_password, reject_password, verify_password};
