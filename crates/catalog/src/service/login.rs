use catalog_core::auth::{credentials_match, reject_password};
use catalog_core::catalog::{LoginOutcome, LoginRequest};
use catalog_core::item::keys::{user_key, USER_LAST_LOGIN};
use catalog_core::item::{format_timestamp, item_to_user};
use catalog_core::storage::{RepositoryError, Result};
use chrono::Utc;

use super::CatalogService;

impl CatalogService {
    /// Checks a user's credentials and records the login time on success.
    ///
    /// Unknown users, wrong emails and wrong passwords all produce the same
    /// `InvalidCredentials` outcome.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        if request.user_id.trim().is_empty() {
            reject_password(&request.password);
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let key = user_key(&request.user_id);
        let Some(item) = self.store.get_item(&self.tables.users, &key).await? else {
            tracing::debug!(user_id = %request.user_id, "Login for unknown user");
            reject_password(&request.password);
            return Ok(LoginOutcome::InvalidCredentials);
        };

        let user = match item_to_user(&item) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(
                    user_id = %request.user_id,
                    error = %e,
                    "Stored user is unreadable, rejecting login"
                );
                reject_password(&request.password);
                return Ok(LoginOutcome::InvalidCredentials);
            }
        };

        if !credentials_match(&user, &request.email, &request.password) {
            tracing::debug!(user_id = %request.user_id, "Login with wrong credentials");
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let now = Utc::now();
        match self
            .store
            .set_attribute(&self.tables.users, &key, USER_LAST_LOGIN, format_timestamp(&now))
            .await
        {
            Ok(()) => {}
            // Removed between the read and the touch.
            Err(RepositoryError::NotFound { .. }) => return Ok(LoginOutcome::InvalidCredentials),
            Err(e) => return Err(e),
        }

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutcome::Success {
            company: user.company,
            last_login: now,
        })
    }
}
