//! Club membership rows.

use serde::{Deserialize, Serialize};

use super::ClubRole;
use crate::domain::foundation::{ClubId, ClubMemberId, Timestamp, UserId};

/// A user's membership in a club. Exactly one role at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubMember {
    pub id: ClubMemberId,
    pub club_id: ClubId,
    pub user_id: UserId,
    pub role: ClubRole,
    pub joined_at: Timestamp,
    pub muted_until: Option<Timestamp>,
    pub points: i64,
}

impl ClubMember {
    /// Creates a plain member joining now.
    pub fn join(club_id: ClubId, user_id: UserId) -> Self {
        Self {
            id: ClubMemberId::new(),
            club_id,
            user_id,
            role: ClubRole::Member,
            joined_at: Timestamp::now(),
            muted_until: None,
            points: 0,
        }
    }

    /// Returns true while a mute is in effect at `now`.
    pub fn is_muted(&self, now: Timestamp) -> bool {
        self.muted_until.map(|until| until.is_after(&now)).unwrap_or(false)
    }

    pub fn mute_until(&mut self, until: Timestamp) {
        self.muted_until = Some(until);
    }

    pub fn unmute(&mut self) {
        self.muted_until = None;
    }

    /// Replaces the member's role.
    pub fn assign_role(&mut self, role: ClubRole) {
        self.role = role;
    }

    /// Adds (or with a negative delta, removes) points. Never drops below zero.
    pub fn add_points(&mut self, delta: i64) {
        self.points = self.points.saturating_add(delta).max(0);
    }
}
