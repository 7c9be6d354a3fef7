use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product listed in an owner's catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    /// Image URL or other reference understood by the frontend.
    pub image: String,
    /// Inactive products are soft-deleted: still stored, hidden by the frontend.
    pub is_active: bool,
    /// Owner of the catalog this product belongs to. Partition key of the owner index.
    pub owner_id: String,
}

impl Product {
    /// Creates an active product with a freshly generated ID.
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            is_active: true,
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }

    /// Sets a specific ID for this product (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// A user allowed to log into the catalog backoffice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub email: String,
    /// Argon2 PHC string. Never the plaintext password.
    pub password_hash: String,
    pub company: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Result of a login attempt.
///
/// Failures carry no detail so callers cannot tell an unknown user from a
/// wrong password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success {
        company: Option<String>,
        last_login: DateTime<Utc>,
    },
    InvalidCredentials,
}
