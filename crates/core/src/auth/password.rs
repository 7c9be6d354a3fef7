use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::catalog::User;

use super::PasswordError;

/// Hash a password using Argon2id with a random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a password against a PHC hash string.
///
/// An unparseable hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash of a random secret, verified against when there is no stored hash.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password(SaltString::generate(&mut OsRng).as_str()).ok());

/// Runs a full verification against a throwaway hash and rejects.
///
/// Used for unknown or unreadable users so every failed login pays the same
/// Argon2 cost.
pub fn reject_password(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        verify_password(password, hash);
    }
    false
}

/// Returns true if `email` and `password` match the stored user.
///
/// The email comparison is exact and case-sensitive. The password is always
/// verified, even when the email already differs.
pub fn credentials_match(user: &User, email: &str, password: &str) -> bool {
    let password_ok = verify_password(password, &user.password_hash);
    password_ok && user.email == email
}
