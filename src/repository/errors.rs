use thiserror::Error;

use crate::dto::api::{FieldErrors, summarize_errors};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Validation error: {}", summarize_errors(.0))]
    Validation(FieldErrors),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Field errors carried by a validation failure, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            RepositoryError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return RepositoryError::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return RepositoryError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        RepositoryError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for RepositoryError {
    fn from(err: url::ParseError) -> Self {
        RepositoryError::InvalidUrl(err.to_string())
    }
}
