//! Club repository port.
//!
//! Read access to clubs and their membership facts, plus the two writes
//! the subscription and role flows need: replacing a member's role and
//! switching a club's tier.

use crate::domain::club::{Club, ClubMember, ClubTier};
use crate::domain::foundation::{ClubId, DomainError, UserId};
use async_trait::async_trait;

/// Officer head-counts used to enforce tier caps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts {
    pub members: u32,
    pub vice_presidents: u32,
    /// Every officer role except president.
    pub officers: u32,
}

/// Repository port for clubs and club membership rows.
#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Find a club by its ID.
    async fn find_by_id(&self, id: &ClubId) -> Result<Option<Club>, DomainError>;

    /// Find the membership row for a user, if they belong to the club.
    async fn find_member(
        &self,
        club_id: &ClubId,
        user_id: &UserId,
    ) -> Result<Option<ClubMember>, DomainError>;

    /// Returns true if the user is on the club's block list.
    async fn is_blocked(&self, club_id: &ClubId, user_id: &UserId) -> Result<bool, DomainError>;

    /// Counts members and officer roles in the club.
    async fn count_roles(&self, club_id: &ClubId) -> Result<RoleCounts, DomainError>;

    /// Persist a changed membership row.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the row doesn't exist
    async fn update_member(&self, member: &ClubMember) -> Result<(), DomainError>;

    /// Switch a club's tier.
    ///
    /// # Errors
    ///
    /// - `ClubNotFound` if the club doesn't exist
    async fn set_tier(&self, club_id: &ClubId, tier: ClubTier) -> Result<(), DomainError>;
}
