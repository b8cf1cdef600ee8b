use axum::extract::rejection::JsonRejection;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tokio::task::JoinError;
use tracing::error;

use crate::service::validation::ValidationError;

#[derive(Debug, ThisError)]
pub enum DeskError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] figment::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid request body: {0}")]
    BodyRejection(#[from] JsonRejection),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    DuplicateUser,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin permission required")]
    Forbidden,

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Invalid cookie key: {0}")]
    CookieKey(String),

    #[error("Blocking task failed: {0}")]
    Join(#[from] JoinError),
}

impl From<argon2::Error> for DeskError {
    fn from(e: argon2::Error) -> Self {
        DeskError::PasswordHash(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for DeskError {
    fn from(e: argon2::password_hash::Error) -> Self {
        DeskError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            DeskError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                err.to_string(),
            ),
            DeskError::BodyRejection(rejection) => (
                StatusCode::BAD_REQUEST,
                "INVALID_BODY",
                rejection.body_text(),
            ),
            DeskError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password.".to_string(),
            ),
            DeskError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Login required.".to_string(),
            ),
            DeskError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Admin permission required.".to_string(),
            ),
            DeskError::DuplicateUser => (
                StatusCode::CONFLICT,
                "USER_EXISTS",
                "Username already exists.".to_string(),
            ),
            DeskError::DatabaseError(_)
            | DeskError::ConfigError(_)
            | DeskError::JsonError(_)
            | DeskError::PasswordHash(_)
            | DeskError::CookieKey(_)
            | DeskError::Join(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
