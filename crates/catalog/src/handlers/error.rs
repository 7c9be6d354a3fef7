use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::storage::{repository_error_to_status_code, RepositoryError};
use serde_json::json;

/// Handler error that renders as a JSON body with a matching status.
///
/// Repository errors carry their own status; anything else is a 500.
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() else {
            tracing::error!(error = %self.0, "Unhandled application error");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "error", "internal server error");
        };

        let status = StatusCode::from_u16(repository_error_to_status_code(repo_error))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match repo_error {
            RepositoryError::NotFound { .. } => {
                tracing::debug!(error = %repo_error, "Not found");
                json_error(status, "message", repo_error.to_string())
            }
            _ if status.is_server_error() => {
                tracing::error!(status = %status, error = %repo_error, "Store error");
                let message = if status == StatusCode::SERVICE_UNAVAILABLE {
                    "store unavailable"
                } else {
                    "internal server error"
                };
                json_error(status, "error", message)
            }
            _ => error_response(status, repo_error.to_string()),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Builds a `{"error": message}` response and logs it as a client error.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let msg = message.into();
    tracing::warn!(status = %status, message = %msg, "API error");
    json_error(status, "error", msg)
}

fn json_error(status: StatusCode, field: &str, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({ field: message }))).into_response()
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_uses_message_field() {
        let (status, body) = render(AppError::from(RepositoryError::NotFound {
            entity_type: "Product",
            id: "p-1".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found: p-1");
    }

    #[tokio::test]
    async fn test_client_errors_use_error_field() {
        let (status, body) =
            render(AppError::from(RepositoryError::Validation("bad".to_string()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed: bad");

        let (status, _) = render(AppError::from(RepositoryError::Conflict {
            entity_type: "Product",
            id: "p-1".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let (status, body) = render(AppError::from(RepositoryError::QueryFailed(
            "GetItem failed: secret".to_string(),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal server error");

        let (status, body) = render(AppError::from(RepositoryError::ConnectionFailed(
            "refused".to_string(),
        )))
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "store unavailable");

        let (status, _) = render(AppError::from(anyhow::anyhow!("boom"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
