//! In-memory implementation of ClubRepository.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::domain::club::{Club, ClubMember, ClubRole, ClubTier};
use crate::domain::foundation::{ClubId, DomainError, ErrorCode, UserId};
use crate::ports::{ClubRepository, RoleCounts};

#[derive(Default)]
struct ClubTables {
    clubs: HashMap<ClubId, Club>,
    members: Vec<ClubMember>,
    blocks: HashSet<(ClubId, UserId)>,
}

/// Club storage backed by process memory.
#[derive(Default)]
pub struct InMemoryClubRepository {
    tables: RwLock<ClubTables>,
}

impl InMemoryClubRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a club.
    pub async fn insert_club(&self, club: Club) {
        self.tables.write().await.clubs.insert(club.id, club);
    }

    /// Inserts or replaces the user's membership row for the club.
    pub async fn insert_member(&self, member: ClubMember) {
        let mut tables = self.tables.write().await;
        tables
            .members
            .retain(|m| !(m.club_id == member.club_id && m.user_id == member.user_id));
        tables.members.push(member);
    }

    pub async fn block(&self, club_id: ClubId, user_id: UserId) {
        self.tables.write().await.blocks.insert((club_id, user_id));
    }

    /// Current tier of a club, if it exists.
    pub async fn tier_of(&self, club_id: &ClubId) -> Option<ClubTier> {
        self.tables.read().await.clubs.get(club_id).map(|c| c.tier)
    }
}

#[async_trait]
impl ClubRepository for InMemoryClubRepository {
    async fn find_by_id(&self, id: &ClubId) -> Result<Option<Club>, DomainError> {
        Ok(self.tables.read().await.clubs.get(id).cloned())
    }

    async fn find_member(
        &self,
        club_id: &ClubId,
        user_id: &UserId,
    ) -> Result<Option<ClubMember>, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .members
            .iter()
            .find(|m| &m.club_id == club_id && &m.user_id == user_id)
            .cloned())
    }

    async fn is_blocked(&self, club_id: &ClubId, user_id: &UserId) -> Result<bool, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .blocks
            .contains(&(*club_id, user_id.clone())))
    }

    async fn count_roles(&self, club_id: &ClubId) -> Result<RoleCounts, DomainError> {
        let tables = self.tables.read().await;
        let mut counts = RoleCounts::default();
        for member in tables.members.iter().filter(|m| &m.club_id == club_id) {
            counts.members += 1;
            if member.role == ClubRole::VicePresident {
                counts.vice_presidents += 1;
            }
            if member.role.is_officer() && member.role != ClubRole::President {
                counts.officers += 1;
            }
        }
        Ok(counts)
    }

    async fn update_member(&self, member: &ClubMember) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => {
                *existing = member.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::MemberNotFound,
                "Club member not found",
            )),
        }
    }

    async fn set_tier(&self, club_id: &ClubId, tier: ClubTier) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.clubs.get_mut(club_id) {
            Some(club) => {
                club.tier = tier;
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::ClubNotFound, "Club not found")),
        }
    }
}
