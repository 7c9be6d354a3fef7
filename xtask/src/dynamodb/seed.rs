//! User provisioning for the catalog login (Functional Core + Imperative Shell).

use std::collections::HashMap;

use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use aws_sdk_dynamodb::Client;
use catalog_core::auth::hash_password;
use catalog_core::catalog::User;
use catalog_core::item::keys::USER_ID;
use catalog_core::item::{user_to_item, AttributeValue, Item};
use catalog_core::storage::RepositoryError;

use super::error::{DynamodbError, Result};

// ============================================================================
// Functional Core
// ============================================================================

/// Builds a user record with a freshly hashed password.
pub fn build_user(
    user_id: &str,
    email: &str,
    password: &str,
    company: Option<&str>,
) -> Result<User> {
    if user_id.trim().is_empty() {
        return Err(RepositoryError::Validation("User id is required".to_string()).into());
    }
    if email.trim().is_empty() {
        return Err(RepositoryError::Validation("Email is required".to_string()).into());
    }

    Ok(User {
        user_id: user_id.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password)?,
        company: company.map(str::to_string),
        last_login: None,
    })
}

fn to_sdk_item(item: Item) -> HashMap<String, SdkValue> {
    item.into_iter()
        .map(|(name, value)| {
            let value = match value {
                AttributeValue::S(s) => SdkValue::S(s),
                AttributeValue::N(n) => SdkValue::N(n),
                AttributeValue::Bool(b) => SdkValue::Bool(b),
            };
            (name, value)
        })
        .collect()
}

// ============================================================================
// Imperative Shell
// ============================================================================

/// Writes the user item. Refuses to replace an existing user unless `overwrite`.
pub async fn put_user(client: &Client, table_name: &str, user: &User, overwrite: bool) -> Result<()> {
    let mut request = client
        .put_item()
        .table_name(table_name)
        .set_item(Some(to_sdk_item(user_to_item(user))));

    if !overwrite {
        request = request
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", USER_ID);
    }

    match request.send().await {
        Ok(_) => Ok(()),
        Err(err) => match err.into_service_error() {
            PutItemError::ConditionalCheckFailedException(_) => Err(DynamodbError::UserExists {
                user_id: user.user_id.clone(),
            }),
            other => Err(DynamodbError::AwsSdk(other.to_string())),
        },
    }
}
