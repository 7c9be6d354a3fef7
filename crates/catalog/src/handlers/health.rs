//! Liveness endpoint.

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// GET /ping - Liveness check.
///
/// Answers 201 with a fixed body and touches no store, matching what existing
/// clients poll for.
#[axum::debug_handler]
pub async fn ping() -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "message": "pong" })))
}
