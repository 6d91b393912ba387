use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;

use crate::error::ErrorResponse;

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

/// Failure with a route-specific body, e.g. `{"success": false}`.
pub fn failure<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(data))
}

pub fn error(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
