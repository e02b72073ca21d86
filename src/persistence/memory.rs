//! In-process session storage

use crate::domain::repositories::session_backend::{SessionBackend, SessionBackendError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Session backend that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionBackend {
    records: Mutex<HashMap<String, String>>,
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw record, bypassing any validation
    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), value.to_string());
        }
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, SessionBackendError> {
        let records = self
            .records
            .lock()
            .map_err(|e| SessionBackendError::Read(e.to_string()))?;
        Ok(records.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), SessionBackendError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SessionBackendError::Write(e.to_string()))?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionBackendError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SessionBackendError::Write(e.to_string()))?;
        records.remove(key);
        Ok(())
    }
}
