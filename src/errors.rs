//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::{GENERIC_SERVER_ERROR_MESSAGE, INVALID_UPDATE_BODY_MESSAGE};

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    // Resource errors
    #[error("{0}")]
    NotFound(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),

    /// Server-side failure carrying an operation-specific public message.
    #[error("{message}")]
    Server {
        message: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    code: &'static str,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized | AppError::Jwt(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) | AppError::Server { .. } => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) | AppError::Server { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True for failures the caller cannot fix (logged, details hidden).
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg) => msg.clone(),

            AppError::Database(e) => {
                tracing::error!(error = ?e, "Database error");
                GENERIC_SERVER_ERROR_MESSAGE.to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                GENERIC_SERVER_ERROR_MESSAGE.to_string()
            }
            AppError::Server { message, source } => {
                tracing::error!(error = ?source, "{}", message);
                message.to_string()
            }

            AppError::Unauthorized => self.to_string(),
        }
    }

    /// Replace the public message of a server-side failure.
    ///
    /// Client errors pass through untouched.
    pub fn with_server_message(self, message: &'static str) -> Self {
        if self.is_server_error() {
            AppError::Server {
                message,
                source: Box::new(self),
            }
        } else {
            self
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            message: self.user_message(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

/// Malformed update bodies; the parser detail only goes to the debug log.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::validation(INVALID_UPDATE_BODY_MESSAGE)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect::<Vec<_>>()
            .join(", ");

        AppError::validation(message)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, msg: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, msg: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(msg.to_string()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
