use axum::{http::StatusCode, response::IntoResponse};

use crate::infrastructure::axum_http::error_responses::ApiError;

pub async fn root() -> impl IntoResponse {
    "Hello from server"
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK").into_response()
}

pub async fn not_found() -> impl IntoResponse {
    ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "NOT_FOUND")
}
