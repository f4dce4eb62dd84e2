//! Error types and handling for the `Wayfarer` application

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::form::FormError;

/// Main error type for the `Wayfarer` application
#[derive(Error, Debug)]
pub enum WayfarerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A requested entity does not exist
    #[error("{what} not found")]
    NotFound { what: String },

    /// Database errors
    #[error("Database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },

    /// Form-state and serialization errors from the admin editors
    #[error(transparent)]
    Form(#[from] FormError),

    /// JSON encoding/decoding errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Email delivery errors
    #[error("Email error: {message}")]
    Email { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WayfarerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error naming the missing entity
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a new email error
    pub fn email<S: Into<String>>(message: S) -> Self {
        Self::Email {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WayfarerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WayfarerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WayfarerError::NotFound { what } => format!("{what} not found"),
            WayfarerError::Database { .. } => {
                "A storage error occurred. Please try again later.".to_string()
            }
            WayfarerError::Form(err) => err.to_string(),
            WayfarerError::Serialization { .. } => {
                "Stored content could not be decoded.".to_string()
            }
            WayfarerError::Email { .. } => {
                "Email could not be sent. Please try again later.".to_string()
            }
            WayfarerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WayfarerError::General { message } => message.clone(),
        }
    }
}

/// Error type returned by HTTP handlers.
///
/// Serializes as `{"error": "<message>"}` with an appropriate status code,
/// the conventional shape the admin and public frontends expect.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        } else {
            tracing::debug!(status = %self.status, message = %self.message, "request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<WayfarerError> for ApiError {
    fn from(err: WayfarerError) -> Self {
        let status = match &err {
            WayfarerError::Validation { .. } | WayfarerError::Form(_) => StatusCode::BAD_REQUEST,
            WayfarerError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.user_message())
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::unprocessable(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("internal error: {err:#}");
        Self::internal("An internal error occurred. Please try again later.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = WayfarerError::config("missing admin token");
        assert!(matches!(config_err, WayfarerError::Config { .. }));

        let validation_err = WayfarerError::validation("slug already taken");
        assert!(matches!(validation_err, WayfarerError::Validation { .. }));

        let missing = WayfarerError::not_found("Tour");
        assert!(matches!(missing, WayfarerError::NotFound { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = WayfarerError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = WayfarerError::validation("price must be non-negative");
        assert!(validation_err.user_message().contains("price must be non-negative"));

        let missing = WayfarerError::not_found("Tour");
        assert_eq!(missing.user_message(), "Tour not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WayfarerError = io_err.into();
        assert!(matches!(err, WayfarerError::Io { .. }));
    }

    #[test]
    fn test_api_error_statuses() {
        let err: ApiError = WayfarerError::not_found("Tour").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = WayfarerError::validation("bad slug").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = WayfarerError::general("boom").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "boom");
    }
}
