//! PostgreSQL connection settings.

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on `max_connections`.
const POOL_CEILING: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` URL. Required.
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Apply `migrations/` before the worker starts.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            run_migrations: false,
        }
    }
}

impl DatabaseConfig {
    /// Pool options sized and timed from this configuration.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Some(Duration::from_secs(self.idle_timeout_secs)))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let scheme_ok = ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme));

        if self.url.trim().is_empty() {
            Err(ValidationError::MissingRequired("DATABASE__URL"))
        } else if !scheme_ok {
            Err(ValidationError::InvalidDatabaseUrl)
        } else if self.min_connections > self.max_connections {
            Err(ValidationError::InvalidPoolSize)
        } else if self.max_connections > POOL_CEILING {
            Err(ValidationError::PoolSizeTooLarge)
        } else {
            Ok(())
        }
    }
}
