//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `MOTORCLUB` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use motorclub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sweeping every {:?}", config.sweep.interval());
//! ```

mod database;
mod error;
mod logging;
mod subscription;
mod sweep;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use subscription::SubscriptionConfig;
pub use sweep::SweepConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Expiry sweep schedule
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Fallback subscription price and period
    #[serde(default)]
    pub subscription: SubscriptionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MOTORCLUB` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `MOTORCLUB__DATABASE__URL=...` -> `database.url = ...`
    /// - `MOTORCLUB__SWEEP__INTERVAL_SECS=600` -> `sweep.interval_secs = 600`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MOTORCLUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.sweep.validate()?;
        self.subscription.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
