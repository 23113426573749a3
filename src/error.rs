use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::models::application::{ActorRole, ApplicationStatus};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Candidate profile is missing or incomplete")]
    ProfileIncomplete,

    #[error("An application for this job already exists")]
    DuplicateApplication,

    #[error("Transition {from} -> {to} is not allowed for role {role}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
        role: ActorRole,
    },

    #[error("Conflicting concurrent update: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable slug so clients can tell a deterministic
    /// domain failure from a retryable infrastructure one without
    /// string-matching human messages.
    pub fn code(&self) -> &'static str {
        match self {
            Error::BadRequest(_) | Error::Validation(_) | Error::Json(_) => "bad_request",
            Error::Unauthorized(_) => "unauthorized",
            Error::Forbidden(_) => "forbidden",
            Error::NotFound(_) => "not_found",
            Error::ProfileIncomplete => "profile_incomplete",
            Error::DuplicateApplication => "duplicate_application",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::Conflict(_) => "conflict",
            _ => "internal",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let code = self.code();
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            err @ Error::ProfileIncomplete => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            err @ Error::DuplicateApplication => (StatusCode::CONFLICT, err.to_string()),
            err @ Error::InvalidTransition { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message, "code": code }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
