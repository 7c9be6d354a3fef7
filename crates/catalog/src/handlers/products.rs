//! Product endpoints under `/api/produto`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use catalog_core::catalog::ProductPayload;

use crate::handlers::error::{error_response, AppError};
use crate::state::AppState;

/// Query parameters for listing an owner's products.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerProductsQuery {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
}

fn parse_body(body: Result<Json<ProductPayload>, JsonRejection>) -> Result<ProductPayload, Response> {
    body.map(|Json(payload)| payload).map_err(|e| {
        tracing::warn!(error = %e, "Rejected product body");
        error_response(StatusCode::BAD_REQUEST, "failed to parse request body")
    })
}

/// GET /api/produto/query/{owner_id} - List an owner's products.
#[axum::debug_handler]
pub async fn query_products(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    params: Result<Query<OwnerProductsQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = match params {
        Ok(params) => params,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected product query string");
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                "failed to parse query string",
            ));
        }
    };

    let products = state
        .service
        .query_by_owner(&owner_id, params.name.as_deref())
        .await?;

    Ok(Json(json!({ "data": products })).into_response())
}

/// GET /api/produto/{id} - Fetch one product.
#[axum::debug_handler]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.service.get_product(&id).await?;

    Ok(Json(json!({ "data": product })))
}

/// POST /api/produto - Create a product.
#[axum::debug_handler]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let payload = match parse_body(body) {
        Ok(payload) => payload,
        Err(response) => return Ok(response),
    };

    let product = state.service.create_product(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "product created", "id": product.id })),
    )
        .into_response())
}

/// PUT /api/produto/{id} - Replace a product.
#[axum::debug_handler]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let payload = match parse_body(body) {
        Ok(payload) => payload,
        Err(response) => return Ok(response),
    };

    state.service.update_product(&id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "product updated" })),
    )
        .into_response())
}

/// DELETE /api/produto/{id} - Deactivate a product, keeping it stored.
#[axum::debug_handler]
pub async fn deactivate_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.service.deactivate_product(&id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "product deactivated" })),
    ))
}

/// DELETE /api/produto/delete/{id} - Remove a product permanently.
#[axum::debug_handler]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.service.delete_product(&id).await?;

    Ok(Json(json!({ "message": "product deleted" })))
}
