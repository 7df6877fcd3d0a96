//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Liveness check
//! GET  /health/ready    - Readiness check (catalog API reachable)
//!
//! GET  /                - Redirect to /product
//! GET  /product         - Product list (shows flashed notifications)
//! GET  /create          - Create form (loads categories once)
//! POST /create          - Submit create form
//!
//! /static/*             - Stylesheet
//! ```

pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::get,
};

use crate::form::LIST_PATH;
use crate::state::AppState;

/// Create the page routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(LIST_PATH) }))
        .route(LIST_PATH, get(products::index))
        .route("/create", get(products::new_product).post(products::create))
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the catalog API is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.api().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog API not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
