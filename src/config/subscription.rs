//! Club subscription defaults
//!
//! Used when the settings table has no override for the pro price or
//! the paid period length.

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    /// Pro tier price in cents
    #[serde(default = "default_pro_price_cents")]
    pub pro_price_cents: i64,

    /// Length of an approved paid period
    #[serde(default = "default_duration_days")]
    pub duration_days: i64,
}

impl SubscriptionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pro_price_cents < 0 {
            return Err(ValidationError::NegativePrice);
        }
        if !(1..=3660).contains(&self.duration_days) {
            return Err(ValidationError::InvalidDuration);
        }
        Ok(())
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            pro_price_cents: default_pro_price_cents(),
            duration_days: default_duration_days(),
        }
    }
}

fn default_pro_price_cents() -> i64 {
    50_000
}

fn default_duration_days() -> i64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SubscriptionConfig::default();
        assert_eq!(config.pro_price_cents, 50_000);
        assert_eq!(config.duration_days, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let config = SubscriptionConfig {
            pro_price_cents: -1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::NegativePrice));
    }

    #[test]
    fn zero_day_period_is_rejected() {
        let config = SubscriptionConfig {
            duration_days: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDuration));
    }

    #[test]
    fn deserializes_partial_section() {
        let config: SubscriptionConfig =
            serde_json::from_str(r#"{ "duration_days": 365 }"#).unwrap();
        assert_eq!(config.duration_days, 365);
        assert_eq!(config.pro_price_cents, 50_000);
    }
}
