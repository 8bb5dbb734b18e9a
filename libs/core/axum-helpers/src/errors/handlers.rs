use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, ErrorResponse};

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    ErrorResponse::new(ErrorCode::NotFound.default_message()).into_response_with(StatusCode::NOT_FOUND)
}
