use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password cannot be empty")]
    Empty,

    #[error("failed to hash password: {0}")]
    Hash(String),
}
