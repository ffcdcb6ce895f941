//! Club aggregate.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{ClubTier, ClubTierLimits};
use crate::domain::foundation::{ClubId, OwnedByUser, Timestamp, UserId, ValidationError};

/// Visibility of a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubType {
    /// Listed and viewable by anyone.
    Public,
    /// Listed and viewable; joining is moderated elsewhere.
    Private,
    /// Hidden from everyone except members and the owner.
    Secret,
}

impl ClubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubType::Public => "public",
            ClubType::Private => "private",
            ClubType::Secret => "secret",
        }
    }
}

impl FromStr for ClubType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(ClubType::Public),
            "private" => Ok(ClubType::Private),
            "secret" => Ok(ClubType::Secret),
            other => Err(ValidationError::invalid_format(
                "club_type",
                format!("unknown club type '{}'", other),
            )),
        }
    }
}

/// A user-created community with typed membership roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub owner_id: UserId,
    pub name: String,
    pub club_type: ClubType,
    pub tier: ClubTier,
    pub created_at: Timestamp,
}

impl Club {
    /// Creates a new free club owned by `owner_id`.
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        club_type: ClubType,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: ClubId::new(),
            owner_id,
            name: trimmed.to_string(),
            club_type,
            tier: ClubTier::Free,
            created_at: Timestamp::now(),
        })
    }

    /// Returns the limits for the club's current tier.
    pub fn limits(&self) -> ClubTierLimits {
        ClubTierLimits::for_tier(self.tier)
    }

    pub fn is_secret(&self) -> bool {
        self.club_type == ClubType::Secret
    }
}

impl OwnedByUser for Club {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}
