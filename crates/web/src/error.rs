//! Unified error handling with Sentry integration.
//!
//! Form problems (bad input, a refused save, an unreachable catalog API) are
//! not errors at this level: the create-form workflow turns them into
//! notifications. `AppError` covers what is left, infrastructure failures
//! that prevent a page from being produced at all.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // Don't expose internal error details to clients
        let status = match &self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, "Internal server error").into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
