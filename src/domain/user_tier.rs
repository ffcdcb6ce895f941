//! Per-user tiers and their limits.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::club::UNBOUNDED;
use crate::domain::foundation::ValidationError;

/// Account tier of an individual user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
    Free,
    Pro,
}

impl UserTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserTier::Free => "free",
            UserTier::Pro => "pro",
        }
    }
}

impl FromStr for UserTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(UserTier::Free),
            "pro" => Ok(UserTier::Pro),
            other => Err(ValidationError::invalid_format(
                "user_tier",
                format!("unknown tier '{}'", other),
            )),
        }
    }
}

/// Limits and flags for a user tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTierLimits {
    pub tier: UserTier,
    pub garage_vehicles: u32,
    pub clubs_owned: u32,
    pub active_listings: u32,
    pub verified_badge: bool,
    pub ad_free: bool,
}

impl UserTierLimits {
    /// | Tier | Vehicles | Clubs owned | Listings | Badge | Ad free |
    /// |------|----------|-------------|----------|-------|---------|
    /// | Free | 3 | 1 | 5 | No | No |
    /// | Pro | unbounded | unbounded | unbounded | Yes | Yes |
    pub fn for_tier(tier: UserTier) -> Self {
        match tier {
            UserTier::Free => Self {
                tier,
                garage_vehicles: 3,
                clubs_owned: 1,
                active_listings: 5,
                verified_badge: false,
                ad_free: false,
            },
            UserTier::Pro => Self {
                tier,
                garage_vehicles: UNBOUNDED,
                clubs_owned: UNBOUNDED,
                active_listings: UNBOUNDED,
                verified_badge: true,
                ad_free: true,
            },
        }
    }

    pub fn can_add_vehicle(&self, current: u32) -> bool {
        self.garage_vehicles == UNBOUNDED || current < self.garage_vehicles
    }

    pub fn can_create_club(&self, currently_owned: u32) -> bool {
        self.clubs_owned == UNBOUNDED || currently_owned < self.clubs_owned
    }

    pub fn can_list_item(&self, active: u32) -> bool {
        self.active_listings == UNBOUNDED || active < self.active_listings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_user_limits() {
        let limits = UserTierLimits::for_tier(UserTier::Free);
        assert_eq!(limits.garage_vehicles, 3);
        assert_eq!(limits.clubs_owned, 1);
        assert_eq!(limits.active_listings, 5);
        assert!(!limits.verified_badge);
        assert!(!limits.ad_free);
    }

    #[test]
    fn pro_user_is_unbounded() {
        let limits = UserTierLimits::for_tier(UserTier::Pro);
        assert_eq!(limits.garage_vehicles, u32::MAX);
        assert!(limits.can_add_vehicle(1_000));
        assert!(limits.can_create_club(1_000));
        assert!(limits.verified_badge);
    }

    #[test]
    fn free_user_cannot_own_second_club() {
        let limits = UserTierLimits::for_tier(UserTier::Free);
        assert!(limits.can_create_club(0));
        assert!(!limits.can_create_club(1));
    }

    #[test]
    fn free_user_listing_cap() {
        let limits = UserTierLimits::for_tier(UserTier::Free);
        assert!(limits.can_list_item(4));
        assert!(!limits.can_list_item(5));
    }

    #[test]
    fn parses_persisted_values() {
        assert_eq!("pro".parse::<UserTier>(), Ok(UserTier::Pro));
        assert!("vip".parse::<UserTier>().is_err());
    }
}
