//! Conversions between domain records and store items.
//!
//! Pure functions, testable without a store. Every product field is written
//! as a string attribute so the store's string operators (`contains`) work on
//! all of them; decoding accepts fields in any order, ignores unknown
//! attributes, and rejects values whose tag or text does not parse.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::catalog::{Product, User};
use crate::storage::{RepositoryError, VERSION_ATTRIBUTE};

use super::keys::*;
use super::value::{get_optional_string, get_string, wrong_type, AttributeValue, Item};

// ============================================================================
// Product conversions
// ============================================================================

/// Convert a Product to a store item, with `active` overriding `product.is_active`.
///
/// A blank identifier is replaced by a fresh UUID; read it back with [`item_id`].
pub fn product_to_item(product: &Product, active: bool) -> Item {
    let id = if product.id.trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        product.id.clone()
    };

    let mut item = Item::new();
    item.insert(PRODUCT_ID.to_string(), AttributeValue::S(id));
    item.insert(
        PRODUCT_NAME.to_string(),
        AttributeValue::S(product.name.clone()),
    );
    item.insert(
        PRODUCT_NAME_LOWER.to_string(),
        AttributeValue::S(product.name.to_lowercase()),
    );
    item.insert(
        PRODUCT_DESCRIPTION.to_string(),
        AttributeValue::S(product.description.clone()),
    );
    item.insert(
        PRODUCT_PRICE.to_string(),
        AttributeValue::S(format_price(product.price)),
    );
    item.insert(
        PRODUCT_CATEGORY.to_string(),
        AttributeValue::S(product.category.clone()),
    );
    item.insert(
        PRODUCT_IMAGE.to_string(),
        AttributeValue::S(product.image.clone()),
    );
    item.insert(
        PRODUCT_ACTIVE.to_string(),
        AttributeValue::S(active.to_string()),
    );
    item.insert(
        PRODUCT_OWNER_ID.to_string(),
        AttributeValue::S(product.owner_id.clone()),
    );

    item
}

/// Convert a store item to a Product.
///
/// Absent fields keep their zero value. `ProductNameLower` is derived data and
/// is not read back.
pub fn item_to_product(item: &Item) -> Result<Product, RepositoryError> {
    let mut product = Product::default();

    for (name, value) in item {
        match name.as_str() {
            PRODUCT_ID => product.id = expect_string(name, value)?,
            PRODUCT_NAME => product.name = expect_string(name, value)?,
            PRODUCT_DESCRIPTION => product.description = expect_string(name, value)?,
            PRODUCT_PRICE => product.price = decode_price(value)?,
            PRODUCT_CATEGORY => product.category = expect_string(name, value)?,
            PRODUCT_IMAGE => product.image = expect_string(name, value)?,
            PRODUCT_ACTIVE => product.is_active = decode_flag(value)?,
            PRODUCT_OWNER_ID => product.owner_id = expect_string(name, value)?,
            _ => {}
        }
    }

    Ok(product)
}

/// Returns the identifier attribute of a product item.
pub fn item_id(item: &Item) -> Option<&str> {
    item.get(PRODUCT_ID).and_then(AttributeValue::as_s)
}

// ============================================================================
// User conversions
// ============================================================================

/// Convert a User to a store item.
pub fn user_to_item(user: &User) -> Item {
    let mut item = Item::new();

    item.insert(
        USER_ID.to_string(),
        AttributeValue::S(user.user_id.clone()),
    );
    item.insert(
        USER_EMAIL.to_string(),
        AttributeValue::S(user.email.clone()),
    );
    item.insert(
        USER_PASSWORD_HASH.to_string(),
        AttributeValue::S(user.password_hash.clone()),
    );
    if let Some(company) = &user.company {
        item.insert(USER_COMPANY.to_string(), AttributeValue::S(company.clone()));
    }
    if let Some(last_login) = &user.last_login {
        item.insert(
            USER_LAST_LOGIN.to_string(),
            format_timestamp(last_login),
        );
    }

    item
}

/// Convert a store item to a User.
pub fn item_to_user(item: &Item) -> Result<User, RepositoryError> {
    let last_login = get_optional_string(item, USER_LAST_LOGIN)?
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    RepositoryError::InvalidData(format!("Invalid {USER_LAST_LOGIN} {s}: {e}"))
                })
        })
        .transpose()?;

    Ok(User {
        user_id: get_string(item, USER_ID)?,
        email: get_string(item, USER_EMAIL)?,
        password_hash: get_string(item, USER_PASSWORD_HASH)?,
        company: get_optional_string(item, USER_COMPANY)?,
        last_login,
    })
}

/// Formats a login timestamp the way the `Last_login` attribute stores it.
pub fn format_timestamp(at: &DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

// ============================================================================
// Versioning
// ============================================================================

/// Reads the optimistic-lock version of an item. Unversioned items are version 0.
pub fn item_version(item: &Item) -> Result<u64, RepositoryError> {
    match item.get(VERSION_ATTRIBUTE) {
        None => Ok(0),
        Some(AttributeValue::N(n)) => n.parse().map_err(|_| {
            RepositoryError::InvalidData(format!("Invalid {VERSION_ATTRIBUTE}: {n}"))
        }),
        Some(other) => Err(wrong_type(VERSION_ATTRIBUTE, "N", other)),
    }
}

/// Stamps an item with a version.
pub fn set_item_version(item: &mut Item, version: u64) {
    item.insert(
        VERSION_ATTRIBUTE.to_string(),
        AttributeValue::N(version.to_string()),
    );
}

// ============================================================================
// Helper functions
// ============================================================================

/// Formats a price with exactly two decimal places, rounding half away from zero.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

fn expect_string(key: &str, value: &AttributeValue) -> Result<String, RepositoryError> {
    match value {
        AttributeValue::S(s) => Ok(s.clone()),
        other => Err(wrong_type(key, "S", other)),
    }
}

/// Prices are written as strings; numbers are accepted for items written by other tools.
fn decode_price(value: &AttributeValue) -> Result<Decimal, RepositoryError> {
    let text = match value {
        AttributeValue::S(s) => s,
        AttributeValue::N(n) => n,
        AttributeValue::Bool(_) => return Err(wrong_type(PRODUCT_PRICE, "S", value)),
    };
    text.trim()
        .parse::<Decimal>()
        .map_err(|_| RepositoryError::InvalidData(format!("{PRODUCT_PRICE} is not a decimal: {text}")))
}

fn decode_flag(value: &AttributeValue) -> Result<bool, RepositoryError> {
    match value {
        AttributeValue::S(s) if s == "true" => Ok(true),
        AttributeValue::S(s) if s == "false" => Ok(false),
        AttributeValue::S(s) => Err(RepositoryError::InvalidData(format!(
            "{PRODUCT_ACTIVE} must be \"true\" or \"false\", got {s:?}"
        ))),
        AttributeValue::Bool(b) => Ok(*b),
        AttributeValue::N(_) => Err(wrong_type(PRODUCT_ACTIVE, "S", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product::new("owner-1", "Red Shoes", Decimal::new(4990, 2))
            .with_id("550e8400-e29b-41d4-a716-446655440003")
            .with_description("Running shoes")
            .with_category("Shoes")
            .with_image("https://example.com/red.png")
    }

    fn sample_user() -> User {
        User {
            user_id: "igor".to_string(),
            email: "igor@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            company: Some("Acme".to_string()),
            last_login: Some(
                DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
        }
    }

    fn s(item: &Item, key: &str) -> String {
        item.get(key).unwrap().as_s().unwrap().to_string()
    }

    #[test]
    fn test_product_round_trip() {
        let product = sample_product();
        let item = product_to_item(&product, product.is_active);
        let parsed = item_to_product(&item).unwrap();

        assert_eq!(parsed, product);
    }

    #[test]
    fn test_inactive_round_trip() {
        let product = sample_product().with_active(false);
        let parsed = item_to_product(&product_to_item(&product, false)).unwrap();

        assert!(!parsed.is_active);
        assert_eq!(parsed, product);
    }

    #[test]
    fn test_product_item_is_all_strings() {
        let item = product_to_item(&sample_product(), true);

        assert_eq!(item.len(), 9);
        assert!(item.values().all(|v| matches!(v, AttributeValue::S(_))));
        assert_eq!(s(&item, "Active"), "true");
        assert_eq!(s(&item, "ProductNameLower"), "red shoes");
        assert_eq!(s(&item, "OwnerId"), "owner-1");
    }

    #[test]
    fn test_active_override_wins() {
        let product = sample_product().with_active(true);
        let item = product_to_item(&product, false);

        assert_eq!(s(&item, "Active"), "false");
    }

    #[test]
    fn test_blank_id_is_generated() {
        let product = sample_product().with_id("");
        let item = product_to_item(&product, true);

        let id = item_id(&item).unwrap();
        assert!(Uuid::parse_str(id).is_ok());

        let parsed = item_to_product(&item).unwrap();
        assert_eq!(parsed.id, id);
        assert_eq!(parsed.name, product.name);
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(Decimal::new(9, 0)), "9.00");
        assert_eq!(format_price(Decimal::new(195, 1)), "19.50");
        assert_eq!(format_price(Decimal::new(10005, 3)), "10.01");
        assert_eq!(format_price(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_price_nine_is_stored_and_read_back() {
        let product = sample_product().with_id("p-9");
        let product = Product {
            price: Decimal::new(9, 0),
            ..product
        };

        let item = product_to_item(&product, true);
        assert_eq!(s(&item, "Price"), "9.00");

        let parsed = item_to_product(&item).unwrap();
        assert_eq!(parsed.price, Decimal::new(900, 2));
        assert_eq!(parsed.price.to_string(), "9.00");
    }

    #[test]
    fn test_decode_ignores_unknown_and_tolerates_missing() {
        let mut item = Item::new();
        item.insert("id".to_string(), AttributeValue::S("p-1".to_string()));
        item.insert("ProductName".to_string(), AttributeValue::S("Hat".to_string()));
        item.insert("Color".to_string(), AttributeValue::S("blue".to_string()));
        item.insert("Version".to_string(), AttributeValue::N("3".to_string()));

        let product = item_to_product(&item).unwrap();

        assert_eq!(product.id, "p-1");
        assert_eq!(product.name, "Hat");
        assert_eq!(product.price, Decimal::ZERO);
        assert!(!product.is_active);
        assert_eq!(product.owner_id, "");
    }

    #[test]
    fn test_decode_rejects_malformed_price() {
        let mut item = product_to_item(&sample_product(), true);
        item.insert("Price".to_string(), AttributeValue::S("abc".to_string()));

        assert_eq!(
            item_to_product(&item),
            Err(RepositoryError::InvalidData(
                "Price is not a decimal: abc".to_string()
            ))
        );
    }

    #[test]
    fn test_decode_accepts_numeric_price_and_bool_flag() {
        let mut item = product_to_item(&sample_product(), true);
        item.insert("Price".to_string(), AttributeValue::N("12.5".to_string()));
        item.insert("Active".to_string(), AttributeValue::Bool(false));

        let product = item_to_product(&item).unwrap();

        assert_eq!(product.price, Decimal::new(125, 1));
        assert!(!product.is_active);
    }

    #[test]
    fn test_decode_rejects_bad_flag_and_wrong_tags() {
        let mut item = product_to_item(&sample_product(), true);
        item.insert("Active".to_string(), AttributeValue::S("yes".to_string()));
        assert!(item_to_product(&item).is_err());

        let mut item = product_to_item(&sample_product(), true);
        item.insert("ProductName".to_string(), AttributeValue::N("1".to_string()));
        assert_eq!(
            item_to_product(&item),
            Err(RepositoryError::InvalidData(
                "Field ProductName has type N, expected S".to_string()
            ))
        );
    }

    #[test]
    fn test_user_round_trip() {
        let user = sample_user();
        let item = user_to_item(&user);
        let parsed = item_to_user(&item).unwrap();

        assert_eq!(parsed, user);
        assert_eq!(s(&item, "Last_login"), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_user_optional_fields() {
        let user = User {
            company: None,
            last_login: None,
            ..sample_user()
        };
        let item = user_to_item(&user);

        assert!(!item.contains_key("Company"));
        assert!(!item.contains_key("Last_login"));
        assert_eq!(item_to_user(&item).unwrap(), user);
    }

    #[test]
    fn test_user_last_login_with_offset() {
        let mut item = user_to_item(&sample_user());
        item.insert(
            "Last_login".to_string(),
            AttributeValue::S("2024-01-15T07:30:00-03:00".to_string()),
        );

        let user = item_to_user(&item).unwrap();
        assert_eq!(user.last_login, sample_user().last_login);
    }

    #[test]
    fn test_user_missing_hash_is_invalid() {
        let mut item = user_to_item(&sample_user());
        item.remove("PasswordHash");

        assert_eq!(
            item_to_user(&item),
            Err(RepositoryError::InvalidData(
                "Missing field: PasswordHash".to_string()
            ))
        );
    }

    #[test]
    fn test_item_version() {
        let mut item = product_to_item(&sample_product(), true);
        assert_eq!(item_version(&item), Ok(0));

        set_item_version(&mut item, 4);
        assert_eq!(item_version(&item), Ok(4));
        assert_eq!(item.get("Version"), Some(&AttributeValue::N("4".to_string())));

        item.insert("Version".to_string(), AttributeValue::S("4".to_string()));
        assert!(item_version(&item).is_err());
    }
}
