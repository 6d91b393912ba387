use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// Message returned for every failed summarize request, whatever the cause.
pub const BLOG_FAILURE_MESSAGE: &str = "Failed to fetch or parse blog";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch data: {0}")]
    Fetch(String),

    #[error("Generation service error: {0}")]
    Service(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Callers only ever see the static message; the cause goes to the log.
        let error = match &self {
            AppError::InvalidInput(msg) => msg.clone(),
            _ => BLOG_FAILURE_MESSAGE.to_string(),
        };

        (self.status(), Json(ErrorResponse { error })).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Fetch(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
