//! # REST API for Users
//!
//! Users are identified by name. Creating a user that already exists returns
//! the existing record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{CreateUserRequest, ErrorResponse};
use tracing::info;

use crate::io::rest::errors::error_response;
use crate::io::rest::mappers::UserMapper;
use crate::AppState;

/// Look up a user by exact name
pub async fn get_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}", name);

    match state.user_service.find_user(&name).await {
        Ok(Some(user)) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("User '{}' not found", name),
            }),
        )
            .into_response(),
        Err(e) => error_response("get user", e),
    }
}

/// Find or create a user
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users - request: {:?}", request);

    match state.user_service.find_or_create_user(&request.name).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => error_response("create user", e),
    }
}
