//! Stored attribute names and primary key construction.
//!
//! The attribute names are the on-disk contract with existing tables and must
//! not change.

use crate::storage::Key;

// ============================================================================
// Entity labels
// ============================================================================

pub const ENTITY_PRODUCT: &str = "Product";
pub const ENTITY_USER: &str = "User";

// ============================================================================
// Product attributes
// ============================================================================

pub const PRODUCT_ID: &str = "id";
pub const PRODUCT_NAME: &str = "ProductName";
pub const PRODUCT_NAME_LOWER: &str = "ProductNameLower";
pub const PRODUCT_DESCRIPTION: &str = "Description";
pub const PRODUCT_PRICE: &str = "Price";
pub const PRODUCT_CATEGORY: &str = "Category";
pub const PRODUCT_IMAGE: &str = "Image";
pub const PRODUCT_ACTIVE: &str = "Active";
pub const PRODUCT_OWNER_ID: &str = "OwnerId";

// ============================================================================
// User attributes
// ============================================================================

pub const USER_ID: &str = "userId";
pub const USER_EMAIL: &str = "Email";
pub const USER_PASSWORD_HASH: &str = "PasswordHash";
pub const USER_COMPANY: &str = "Company";
pub const USER_LAST_LOGIN: &str = "Last_login";

/// Primary key of a product item.
pub fn product_key(id: impl Into<String>) -> Key {
    Key::new(ENTITY_PRODUCT, PRODUCT_ID, id)
}

/// Primary key of a user item.
pub fn user_key(user_id: impl Into<String>) -> Key {
    Key::new(ENTITY_USER, USER_ID, user_id)
}
