//! PostgreSQL implementation of ClubRepository.

use crate::domain::club::{Club, ClubMember, ClubRole, ClubTier, ClubType};
use crate::domain::foundation::{ClubId, ClubMemberId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{ClubRepository, RoleCounts};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the ClubRepository port.
pub struct PostgresClubRepository {
    pool: PgPool,
}

impl PostgresClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClubRow {
    id: Uuid,
    owner_id: String,
    name: String,
    club_type: String,
    tier: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ClubRow> for Club {
    type Error = DomainError;

    fn try_from(row: ClubRow) -> Result<Self, Self::Error> {
        Ok(Club {
            id: ClubId::from_uuid(row.id),
            owner_id: parse_user_id(row.owner_id)?,
            name: row.name,
            club_type: parse_club_type(&row.club_type)?,
            tier: parse_tier(&row.tier)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    club_id: Uuid,
    user_id: String,
    role: String,
    joined_at: DateTime<Utc>,
    muted_until: Option<DateTime<Utc>>,
    points: i64,
}

impl TryFrom<MemberRow> for ClubMember {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(ClubMember {
            id: ClubMemberId::from_uuid(row.id),
            club_id: ClubId::from_uuid(row.club_id),
            user_id: parse_user_id(row.user_id)?,
            role: parse_role(&row.role)?,
            joined_at: Timestamp::from_datetime(row.joined_at),
            muted_until: row.muted_until.map(Timestamp::from_datetime),
            points: row.points,
        })
    }
}

fn invalid_value(kind: &str, value: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", kind, value),
    )
}

fn parse_club_type(s: &str) -> Result<ClubType, DomainError> {
    s.parse().map_err(|_| invalid_value("club type", s))
}

fn parse_tier(s: &str) -> Result<ClubTier, DomainError> {
    s.parse().map_err(|_| invalid_value("tier", s))
}

fn parse_role(s: &str) -> Result<ClubRole, DomainError> {
    s.parse().map_err(|_| invalid_value("role", s))
}

fn parse_user_id(s: String) -> Result<UserId, DomainError> {
    UserId::new(s).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e))
    })
}

fn to_count(n: i64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[async_trait]
impl ClubRepository for PostgresClubRepository {
    async fn find_by_id(&self, id: &ClubId) -> Result<Option<Club>, DomainError> {
        let row: Option<ClubRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, name, club_type, tier, created_at
            FROM clubs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find club", e))?;

        row.map(Club::try_from).transpose()
    }

    async fn find_member(
        &self,
        club_id: &ClubId,
        user_id: &UserId,
    ) -> Result<Option<ClubMember>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT id, club_id, user_id, role, joined_at, muted_until, points
            FROM club_members
            WHERE club_id = $1 AND user_id = $2
            "#,
        )
        .bind(club_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find club member", e))?;

        row.map(ClubMember::try_from).transpose()
    }

    async fn is_blocked(&self, club_id: &ClubId, user_id: &UserId) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM club_blocks WHERE club_id = $1 AND user_id = $2)",
        )
        .bind(club_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to check club block list", e))
    }

    async fn count_roles(&self, club_id: &ClubId) -> Result<RoleCounts, DomainError> {
        let (members, vice_presidents, officers): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE role = 'vice_president'),
                   COUNT(*) FILTER (WHERE role NOT IN ('president', 'member'))
            FROM club_members
            WHERE club_id = $1
            "#,
        )
        .bind(club_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to count club roles", e))?;

        Ok(RoleCounts {
            members: to_count(members),
            vice_presidents: to_count(vice_presidents),
            officers: to_count(officers),
        })
    }

    async fn update_member(&self, member: &ClubMember) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE club_members SET role = $2, muted_until = $3, points = $4
            WHERE id = $1
            "#,
        )
        .bind(member.id.as_uuid())
        .bind(member.role.as_str())
        .bind(member.muted_until.map(|t| *t.as_datetime()))
        .bind(member.points)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update club member", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::MemberNotFound, "Club member not found"));
        }
        Ok(())
    }

    async fn set_tier(&self, club_id: &ClubId, tier: ClubTier) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE clubs SET tier = $2, updated_at = now() WHERE id = $1")
            .bind(club_id.as_uuid())
            .bind(tier.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to set club tier", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ClubNotFound, "Club not found"));
        }
        Ok(())
    }
}
