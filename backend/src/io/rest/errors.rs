//! Translation of domain failures into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::error::ServiceError;

pub fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log `error` against `action` and render it as `{"error": "..."}`.
pub fn error_response(action: &str, error: ServiceError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!("Failed to {}: {}", action, error);
    } else {
        warn!("Rejected request to {}: {}", action, error);
    }
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}
