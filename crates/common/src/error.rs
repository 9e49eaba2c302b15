//! Error types for pic4pick.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    /// Carries the reason the caller could not be authenticated.
    #[error("{0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration required: {0}")]
    MigrationRequired(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Classified driver failure, used to keep raw driver text out of responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseFailure {
    /// A table the query needs does not exist.
    MissingTable,
    /// A column the query needs does not exist.
    OutdatedSchema,
    /// The pool could not reach the server.
    ConnectionRefused,
    /// Anything else.
    Other,
}

impl DatabaseFailure {
    /// Classify a raw driver message.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("er_no_such_table")
            || lower.contains("1146 (42s02)")
            || lower.contains("doesn't exist")
        {
            Self::MissingTable
        } else if lower.contains("er_bad_field_error")
            || lower.contains("1054 (42s22)")
            || lower.contains("unknown column")
        {
            Self::OutdatedSchema
        } else if lower.contains("connection refused") || lower.contains("econnrefused") {
            Self::ConnectionRefused
        } else {
            Self::Other
        }
    }

    /// Client-facing message for this failure.
    #[must_use]
    pub const fn public_message(self) -> &'static str {
        match self {
            Self::MissingTable => "Database table missing, please run migrations",
            Self::OutdatedSchema => "Database schema is outdated, please run migrations",
            Self::ConnectionRefused => "Cannot connect to database, check DB config",
            Self::Other => "Database operation failed",
        }
    }
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,

            // 5xx Server Errors
            Self::Database(_)
            | Self::MigrationRequired(_)
            | Self::Storage(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::MigrationRequired(_) => "MIGRATION_REQUIRED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message safe to send to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(raw) => DatabaseFailure::classify(raw).public_message().to_string(),
            Self::MigrationRequired(what) => {
                format!("{what}, please run migrations")
            }
            Self::Storage(_) => "Object storage operation failed".to_string(),
            Self::Config(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "code": code,
            "message": self.public_message(),
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_mysql_driver_messages() {
        assert_eq!(
            DatabaseFailure::classify(
                "Query Error: error returned from database: 1146 (42S02): Table 'pic4pick.photos' doesn't exist"
            ),
            DatabaseFailure::MissingTable
        );
        assert_eq!(
            DatabaseFailure::classify(
                "error returned from database: 1054 (42S22): Unknown column 'hidden' in 'field list'"
            ),
            DatabaseFailure::OutdatedSchema
        );
        assert_eq!(
            DatabaseFailure::classify("Connection Error: Connection refused (os error 111)"),
            DatabaseFailure::ConnectionRefused
        );
        assert_eq!(
            DatabaseFailure::classify("Duplicate entry 'x' for key 'PRIMARY'"),
            DatabaseFailure::Other
        );
    }

    #[test]
    fn test_database_error_message_is_sanitized() {
        let err = AppError::Database("Unknown column 'lens' in 'field list'".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("lens"));
        assert!(err.public_message().contains("run migrations"));
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::Unauthorized("Token expired".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.public_message(), "Token expired");

        let err = AppError::Validation("Comment content must be at most 1000 characters".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.public_message(),
            "Comment content must be at most 1000 characters"
        );
    }
}
