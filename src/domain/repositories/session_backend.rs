//! Storage for the single persisted session record

use async_trait::async_trait;
use thiserror::Error;

/// Key under which the serialized identity is stored
pub const SESSION_KEY: &str = "user";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionBackendError {
    #[error("Session storage read failed: {0}")]
    Read(String),

    #[error("Session storage write failed: {0}")]
    Write(String),
}

/// Key/value storage holding opaque session records
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, SessionBackendError>;

    /// Replace the value stored under `key`
    async fn write(&self, key: &str, value: &str) -> Result<(), SessionBackendError>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), SessionBackendError>;
}
