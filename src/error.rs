//! Application-wide error type.
//!
//! [`AppError`] is returned by the code generator, repositories and services,
//! and converts directly into an HTTP response for Axum handlers.
//!
//! # Response Format
//!
//! ```json
//! {
//!   "error": {
//!     "code": "not_found",
//!     "message": "Short link not found",
//!     "details": { "short_code": "abc123" }
//!   }
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Boxed error used as the wrapped cause of storage failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Client-facing error description.
///
/// Never contains the underlying cause of a storage or entropy failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Error taxonomy of the service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed caller input (bad generator arguments, invalid URL).
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// Lookup miss.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Unique constraint violation reported by a store.
    ///
    /// The link service treats this as a short code collision and retries.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Every generated short code collided with an existing one.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: usize },

    /// Persistence or backing store error, wrapped with context.
    #[error("{context}: {source}")]
    StoreFailure {
        context: String,
        #[source]
        source: BoxError,
    },

    /// The entropy source failed to produce random bytes.
    #[error("random source failure: {reason}")]
    RandomSourceFailure { reason: String },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    /// Wraps a backend error with a short description of the failed operation.
    pub fn store(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::StoreFailure {
            context: context.into(),
            source: source.into(),
        }
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::CodeGenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::StoreFailure { .. } | AppError::RandomSourceFailure { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the client-facing representation of this error.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::InvalidInput { message, details } => ErrorInfo {
                code: "invalid_input",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Conflict { message, details } => ErrorInfo {
                code: "conflict",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::CodeGenerationExhausted { attempts } => ErrorInfo {
                code: "code_generation_exhausted",
                message: "Could not allocate a unique short code".to_string(),
                details: json!({ "attempts": attempts }),
            },
            AppError::StoreFailure { .. } => ErrorInfo {
                code: "store_failure",
                message: "Storage backend failure".to_string(),
                details: json!({}),
            },
            AppError::RandomSourceFailure { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::store("database error", e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::invalid_input(
            "Request validation failed",
            serde_json::to_value(&errors).unwrap_or(Value::Null),
        )
    }
}
