//! Error types for the library client

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Error envelope returned by the remote API
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body sent by the API on failed requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
    /// Structured error code, when the backend provides one
    #[serde(default)]
    pub code: Option<String>,
}

impl AppError {
    /// Build an error from a non-success status and its (possibly empty) body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let envelope: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
        let message = if envelope.message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            envelope.message
        };

        match status {
            StatusCode::UNAUTHORIZED => AppError::Authentication(message),
            StatusCode::FORBIDDEN => AppError::Authorization(message),
            StatusCode::NOT_FOUND if envelope.code.is_none() => AppError::NotFound(message),
            _ => AppError::Api {
                status: status.as_u16(),
                message,
                code: envelope.code,
            },
        }
    }

    /// Message reported by the server, if this error came from one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Api { message, .. }
            | AppError::Authentication(message)
            | AppError::Authorization(message)
            | AppError::NotFound(message) => Some(message),
            _ => None,
        }
    }

    /// Structured error code, if the server sent one
    pub fn server_code(&self) -> Option<&str> {
        match self {
            AppError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// True when the server rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Authentication(_))
    }

    /// Per-field validation messages, sorted by field name
    pub fn field_messages(&self) -> Vec<(String, String)> {
        let AppError::Validation(errors) = self else {
            return Vec::new();
        };

        let mut messages: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let text = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    (field.to_string(), text)
                })
            })
            .collect();
        messages.sort();
        messages
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
