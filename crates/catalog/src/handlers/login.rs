//! Credential check endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use catalog_core::catalog::{LoginOutcome, LoginRequest};

use crate::handlers::error::{error_response, AppError};
use crate::state::AppState;

/// POST /login - Verify credentials and record the login time.
///
/// Every failure answers the same 401 so callers cannot tell which part of
/// the credentials was wrong.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected login body");
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                "failed to parse request body",
            ));
        }
    };

    let response = match state.service.login(&request).await? {
        LoginOutcome::Success { company, .. } => (
            StatusCode::OK,
            Json(json!({ "message": "login successful", "company": company })),
        ),
        LoginOutcome::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid login" })),
        ),
    };

    Ok(response.into_response())
}
