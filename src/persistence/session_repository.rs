//! SQLite-backed session record storage

use super::{DatabaseError, DbPool};
use crate::domain::repositories::session_backend::{SessionBackend, SessionBackendError};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error};

pub struct SqliteSessionBackend {
    pool: DbPool,
}

impl SqliteSessionBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value: Option<(String,)> =
            sqlx::query_as("SELECT value FROM session_records WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    error!("Failed to read session record {}: {}", key, e);
                    DatabaseError::QueryError(format!("Failed to read session record: {}", e))
                })?;

        Ok(value.map(|(value,)| value))
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO session_records (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to write session record {}: {}", key, e);
            DatabaseError::QueryError(format!("Failed to write session record: {}", e))
        })?;

        debug!("Stored session record: {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM session_records WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete session record {}: {}", key, e);
                DatabaseError::QueryError(format!("Failed to delete session record: {}", e))
            })?;

        debug!(
            "Removed session record: {} ({} rows)",
            key,
            result.rows_affected()
        );
        Ok(())
    }
}

#[async_trait]
impl SessionBackend for SqliteSessionBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, SessionBackendError> {
        self.get(key)
            .await
            .map_err(|e| SessionBackendError::Read(e.to_string()))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), SessionBackendError> {
        self.upsert(key, value)
            .await
            .map_err(|e| SessionBackendError::Write(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), SessionBackendError> {
        self.delete(key)
            .await
            .map_err(|e| SessionBackendError::Write(e.to_string()))
    }
}
