//! Settings repository port.
//!
//! Flat key/value storage behind the application's settings store.

use crate::domain::foundation::DomainError;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load every stored setting.
    async fn get_all(&self) -> Result<HashMap<String, String>, DomainError>;

    /// Insert or replace a setting.
    async fn put(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Remove a setting. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}
