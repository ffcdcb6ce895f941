//! Club tier definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Feature tier of a club.
///
/// A club is promoted to `Pro` while it holds an active paid subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubTier {
    /// Free tier - capped membership and officer slots.
    Free,

    /// Paid tier - unbounded limits, every feature flag on.
    Pro,
}

impl ClubTier {
    /// Returns true if this tier is a paid tier.
    pub fn is_paid(&self) -> bool {
        matches!(self, ClubTier::Pro)
    }

    /// Returns the persisted string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubTier::Free => "free",
            ClubTier::Pro => "pro",
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            ClubTier::Free => "Free",
            ClubTier::Pro => "Pro",
        }
    }
}

impl std::fmt::Display for ClubTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ClubTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(ClubTier::Free),
            "pro" => Ok(ClubTier::Pro),
            other => Err(ValidationError::invalid_format(
                "club_tier",
                format!("unknown tier '{}'", other),
            )),
        }
    }
}
