use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the remote collaborators (account, transaction and
/// market-data APIs) before they are classified for the views.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("Resource not found")]
    NotFound,

    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Errors surfaced by the orchestration layer
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "message")]
pub enum ClientError {
    /// Absence of a resource that has a valid empty interpretation
    #[error("Resource not found")]
    NotFound,

    #[error("{message}")]
    RemoteFailure { message: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No active session")]
    Unauthenticated,

    /// The session changed while the request was in flight
    #[error("Result discarded: session changed during request")]
    Superseded,

    #[error("Session persistence failed: {0}")]
    Persistence(String),
}

impl ClientError {
    /// Whether a view should show this error to the user
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, ClientError::NotFound | ClientError::Superseded)
    }
}

impl From<ApiError> for ClientError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound => ClientError::NotFound,
            ApiError::Status { detail, .. } => ClientError::RemoteFailure { message: detail },
            other => ClientError::RemoteFailure {
                message: other.to_string(),
            },
        }
    }
}
