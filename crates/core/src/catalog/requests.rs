//! API request types for catalog operations.
//!
//! Pure data types with no I/O. Missing fields fall back to their zero value,
//! matching what the frontend has always been allowed to send.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::Product;

/// Request body for creating or fully replacing a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    /// Ignored on create and update: identifiers come from the server or the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    /// Only honored on update. An omitted flag is `false`, so a full update
    /// that leaves it out deactivates the product.
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub owner_id: String,
}

impl ProductPayload {
    /// Builds the stored record for `id` with the given active flag.
    pub fn into_product(self, id: impl Into<String>, is_active: bool) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            is_active,
            owner_id: self.owner_id,
        }
    }
}

/// Request body for `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "user")]
    pub user_id: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_defaults_missing_fields() {
        let payload: ProductPayload =
            serde_json::from_str(r#"{"name":"Red Shoes","ownerId":"o-1"}"#).unwrap();

        assert_eq!(payload.name, "Red Shoes");
        assert_eq!(payload.owner_id, "o-1");
        assert_eq!(payload.price, Decimal::ZERO);
        assert!(!payload.is_active);
        assert_eq!(payload.id, None);
    }

    #[test]
    fn test_payload_accepts_integer_and_fractional_prices() {
        let payload: ProductPayload = serde_json::from_str(r#"{"price":9}"#).unwrap();
        assert_eq!(payload.price, Decimal::new(9, 0));

        let payload: ProductPayload = serde_json::from_str(r#"{"price":19.5}"#).unwrap();
        assert_eq!(payload.price, Decimal::new(195, 1));
    }

    #[test]
    fn test_into_product_uses_given_id_and_flag() {
        let payload = ProductPayload {
            id: Some("ignored".to_string()),
            name: "Hat".to_string(),
            is_active: false,
            owner_id: "o-1".to_string(),
            ..ProductPayload::default()
        };

        let product = payload.into_product("p-7", true);

        assert_eq!(product.id, "p-7");
        assert!(product.is_active);
        assert_eq!(product.name, "Hat");
    }

    #[test]
    fn test_login_request_field_names() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"user":"igor","email":"i@x.com","password":"pw"}"#).unwrap();

        assert_eq!(request.user_id, "igor");
        assert_eq!(request.email, "i@x.com");
        assert_eq!(request.password, "pw");
    }
}
