//! PostgreSQL implementation of SettingsRepository.

use crate::domain::foundation::DomainError;
use crate::ports::SettingsRepository;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct PostgresSettingsRepository {
    pool: PgPool,
}

impl PostgresSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepository {
    async fn get_all(&self) -> Result<HashMap<String, String>, DomainError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load settings", e))?;

        Ok(rows.into_iter().collect())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at) VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save setting", e))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to delete setting", e))?;

        Ok(())
    }
}
