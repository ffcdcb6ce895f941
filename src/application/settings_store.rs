//! Process-wide settings store.
//!
//! Wraps the settings repository with a read cache. The cache is filled
//! lazily on the first read, dropped on every write through the store, and
//! reloaded on demand with [`SettingsStore::refresh`]. Writes made to the
//! table by other processes become visible only after a refresh.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::SubscriptionConfig;
use crate::domain::foundation::{DomainError, Money};
use crate::ports::SettingsRepository;

/// Pro tier price in cents.
pub const CLUB_PRO_PRICE_KEY: &str = "club_pro_price_cents";

/// Length of an approved paid period in days.
pub const CLUB_PRO_DURATION_DAYS_KEY: &str = "club_pro_duration_days";

pub struct SettingsStore {
    repository: Arc<dyn SettingsRepository>,
    defaults: SubscriptionConfig,
    cache: RwLock<Option<HashMap<String, String>>>,
}

impl SettingsStore {
    pub fn new(repository: Arc<dyn SettingsRepository>, defaults: SubscriptionConfig) -> Self {
        Self {
            repository,
            defaults,
            cache: RwLock::new(None),
        }
    }

    /// Returns the raw value for `key`.
    pub async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        if let Some(values) = self.cache.read().await.as_ref() {
            return Ok(values.get(key).cloned());
        }

        let mut cache = self.cache.write().await;
        if cache.is_none() {
            *cache = Some(self.repository.get_all().await?);
        }
        Ok(cache.as_ref().and_then(|values| values.get(key).cloned()))
    }

    /// Stores `value` under `key` and invalidates the cache.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut cache = self.cache.write().await;
        self.repository.put(key, value).await?;
        *cache = None;
        tracing::info!(key, "Setting updated");
        Ok(())
    }

    /// Removes `key` and invalidates the cache.
    pub async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut cache = self.cache.write().await;
        self.repository.delete(key).await?;
        *cache = None;
        tracing::info!(key, "Setting removed");
        Ok(())
    }

    /// Reloads every setting from the repository.
    pub async fn refresh(&self) -> Result<(), DomainError> {
        let values = self.repository.get_all().await?;
        *self.cache.write().await = Some(values);
        Ok(())
    }

    /// Pro tier list price.
    pub async fn club_pro_price(&self) -> Result<Money, DomainError> {
        let cents = self
            .parsed(CLUB_PRO_PRICE_KEY, |cents: &i64| *cents >= 0)
            .await?
            .unwrap_or(self.defaults.pro_price_cents);
        Ok(Money::from_cents(cents))
    }

    /// Length of an approved paid period in days.
    pub async fn club_pro_duration_days(&self) -> Result<i64, DomainError> {
        Ok(self
            .parsed(CLUB_PRO_DURATION_DAYS_KEY, |days: &i64| *days > 0)
            .await?
            .unwrap_or(self.defaults.duration_days))
    }

    /// Parses a numeric setting; unparsable or out-of-range values fall
    /// back to the configured default.
    async fn parsed(
        &self,
        key: &str,
        accept: impl Fn(&i64) -> bool,
    ) -> Result<Option<i64>, DomainError> {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(value) if accept(&value) => Ok(Some(value)),
            _ => {
                tracing::warn!(key, value = %raw, "Ignoring invalid setting");
                Ok(None)
            }
        }
    }
}
