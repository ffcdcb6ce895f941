//! Tier-based club limits.
//!
//! Defines what a club can do based on its tier. "Unbounded" is the
//! sentinel [`UNBOUNDED`] so every limit is a plain number.

use super::ClubTier;
use serde::{Deserialize, Serialize};

/// Sentinel meaning "no limit".
pub const UNBOUNDED: u32 = u32::MAX;

/// Limits and feature flags for a club tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubTierLimits {
    /// The tier these limits apply to.
    pub tier: ClubTier,
    pub max_members: u32,
    pub max_vice_presidents: u32,
    /// Officer slots, excluding the president.
    pub max_officers: u32,
    pub rides_per_month: u32,
    pub pinned_posts: u32,
    pub custom_branding: bool,
    pub ride_analytics: bool,
    pub featured_listing: bool,
    pub member_export: bool,
}

impl ClubTierLimits {
    /// Get the limits for a specific tier.
    ///
    /// | Tier | Members | VPs | Officers | Rides/mo | Pinned | Flags |
    /// |------|---------|-----|----------|----------|--------|-------|
    /// | Free | 50 | 1 | 3 | 4 | 1 | none |
    /// | Pro | unbounded | unbounded | unbounded | unbounded | unbounded | all |
    pub fn for_tier(tier: ClubTier) -> Self {
        match tier {
            ClubTier::Free => Self {
                tier,
                max_members: 50,
                max_vice_presidents: 1,
                max_officers: 3,
                rides_per_month: 4,
                pinned_posts: 1,
                custom_branding: false,
                ride_analytics: false,
                featured_listing: false,
                member_export: false,
            },
            ClubTier::Pro => Self {
                tier,
                max_members: UNBOUNDED,
                max_vice_presidents: UNBOUNDED,
                max_officers: UNBOUNDED,
                rides_per_month: UNBOUNDED,
                pinned_posts: UNBOUNDED,
                custom_branding: true,
                ride_analytics: true,
                featured_listing: true,
                member_export: true,
            },
        }
    }

    /// Check if the member limit has been reached.
    pub fn member_limit_reached(&self, current_members: u32) -> bool {
        limit_reached(self.max_members, current_members)
    }

    /// Check if no further vice president can be appointed.
    pub fn vice_president_limit_reached(&self, current_vice_presidents: u32) -> bool {
        limit_reached(self.max_vice_presidents, current_vice_presidents)
    }

    /// Check if no further officer can be appointed.
    pub fn officer_limit_reached(&self, current_officers: u32) -> bool {
        limit_reached(self.max_officers, current_officers)
    }
}

fn limit_reached(max: u32, current: u32) -> bool {
    max != UNBOUNDED && current >= max
}
