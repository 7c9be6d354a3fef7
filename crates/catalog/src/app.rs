use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::{
        health::ping,
        login::login,
        products::{
            create_product, deactivate_product, delete_product, get_product, query_products,
            update_product,
        },
    },
    state::AppState,
};

/// Browsers may cache preflight answers for 12 hours.
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// CORS for the configured frontend origins, with credentials.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let timeout = state.config.request_timeout();

    let product_routes = Router::new()
        .route("/", post(create_product))
        .route("/query/{owner_id}", get(query_products))
        .route("/delete/{id}", delete(delete_product))
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .delete(deactivate_product),
        );

    Router::new()
        .route("/ping", get(ping))
        .route("/login", post(login))
        .nest("/api/produto", product_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
