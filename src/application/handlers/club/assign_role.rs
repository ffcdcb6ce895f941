//! AssignRoleHandler - Command handler for changing a member's club role.
//!
//! # Rules
//!
//! - The actor must be allowed to manage roles (owner, president, VP)
//! - The new role must be one the actor can hand out; the owner may hand
//!   out every role below president
//! - Only members strictly junior to the actor can be changed, and the
//!   owner's own row never changes here
//! - Appointing a vice president or officer respects the club tier caps

use std::sync::Arc;
use tracing::info;

use crate::domain::club::{ClubAction, ClubError, ClubMember, ClubPolicy, ClubRole};
use crate::domain::foundation::{ClubId, UserId};
use crate::ports::ClubRepository;

#[derive(Debug, Clone)]
pub struct AssignRoleCommand {
    pub club_id: ClubId,
    pub actor_id: UserId,
    pub target_user_id: UserId,
    pub role: ClubRole,
}

#[derive(Debug, Clone)]
pub struct AssignRoleResult {
    pub member: ClubMember,
    pub previous_role: ClubRole,
}

pub struct AssignRoleHandler {
    clubs: Arc<dyn ClubRepository>,
}

impl AssignRoleHandler {
    pub fn new(clubs: Arc<dyn ClubRepository>) -> Self {
        Self { clubs }
    }

    pub async fn handle(&self, cmd: AssignRoleCommand) -> Result<AssignRoleResult, ClubError> {
        // 1. Load club and actor facts
        let club = self
            .clubs
            .find_by_id(&cmd.club_id)
            .await?
            .ok_or_else(|| ClubError::not_found(cmd.club_id))?;
        let actor_role = self
            .clubs
            .find_member(&club.id, &cmd.actor_id)
            .await?
            .map(|m| m.role);
        let blocked = self.clubs.is_blocked(&club.id, &cmd.actor_id).await?;
        let policy = ClubPolicy::new(&club, &cmd.actor_id, actor_role, blocked);

        // 2. Actor may manage roles and hand out this one
        policy.authorize(ClubAction::ManageRoles).into_result()?;
        let assignable = if policy.is_owner() {
            ClubRole::President.assignable_roles()
        } else {
            actor_role.map(|r| r.assignable_roles()).unwrap_or_default()
        };
        if !assignable.contains(&cmd.role) {
            return Err(ClubError::role_not_assignable(actor_role, cmd.role));
        }

        // 3. Target must be a junior member
        let mut target = self
            .clubs
            .find_member(&club.id, &cmd.target_user_id)
            .await?
            .ok_or_else(|| ClubError::member_not_found(club.id, cmd.target_user_id.clone()))?;
        if target.user_id == club.owner_id {
            return Err(ClubError::forbidden(
                ClubAction::ManageRoles.as_str(),
                "The club owner's role cannot be changed",
            ));
        }
        let outranks_target = policy.is_owner()
            || actor_role.map_or(false, |r| r.outranks(&target.role));
        if !outranks_target {
            return Err(ClubError::forbidden(
                ClubAction::ManageRoles.as_str(),
                "Cannot change the role of an equal or senior member",
            ));
        }

        let previous_role = target.role;
        if previous_role == cmd.role {
            return Ok(AssignRoleResult {
                member: target,
                previous_role,
            });
        }

        // 4. Tier caps
        let limits = club.limits();
        let counts = self.clubs.count_roles(&club.id).await?;
        if cmd.role == ClubRole::VicePresident
            && limits.vice_president_limit_reached(counts.vice_presidents)
        {
            return Err(ClubError::tier_limit_reached(
                "vice presidents",
                limits.max_vice_presidents,
            ));
        }
        // Presidents sit outside the officer count, so leaving that seat for
        // another officer role adds one.
        let adds_officer = cmd.role.is_officer()
            && (!previous_role.is_officer() || previous_role == ClubRole::President);
        if adds_officer && limits.officer_limit_reached(counts.officers)
        {
            return Err(ClubError::tier_limit_reached("officers", limits.max_officers));
        }

        // 5. Persist
        target.assign_role(cmd.role);
        self.clubs.update_member(&target).await?;

        info!(
            club_id = %club.id,
            actor = %cmd.actor_id,
            target = %target.user_id,
            from = %previous_role,
            to = %cmd.role,
            "Club role assigned"
        );

        Ok(AssignRoleResult {
            member: target,
            previous_role,
        })
    }
}
