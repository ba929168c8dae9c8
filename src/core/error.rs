use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("SMTP configuration error: {0}")]
    EmailConfig(String),

    #[error("SMTP authentication failed: {0}")]
    EmailAuth(String),

    #[error("SMTP host not found: {0}")]
    EmailHost(String),

    #[error("SMTP connection failed: {0}")]
    EmailConnection(String),

    #[error("Email send failed: {0}")]
    EmailSend(String),
}

/// Wire shape for every failed request: `{ "error": ..., "details": ... }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(msg),
                )
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::EmailConfig(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::EmailAuth(details) => (
                StatusCode::BAD_REQUEST,
                "SMTP authentication failed. Please check your email username and password \
                 (use an App Password for Gmail)."
                    .to_string(),
                Some(details),
            ),
            AppError::EmailHost(details) => (
                StatusCode::BAD_REQUEST,
                "SMTP server not found. Please check your SMTP server address \
                 (e.g. smtp.gmail.com for Gmail, smtp-mail.outlook.com for Outlook)."
                    .to_string(),
                Some(details),
            ),
            AppError::EmailConnection(details) => (
                StatusCode::BAD_REQUEST,
                "Connection to the SMTP server failed. Please check your SMTP port and \
                 server settings (common ports: 587 TLS, 465 SSL)."
                    .to_string(),
                Some(details),
            ),
            AppError::EmailSend(details) => {
                tracing::error!("Email send failed: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".to_string(),
                    Some(details),
                )
            }
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
