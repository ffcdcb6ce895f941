//! Per-action authorization for clubs.
//!
//! Every check composes three facts about the acting user: whether they
//! own the club, which role (if any) they hold in it, and whether they are
//! on the club's block list. Ownership satisfies every management check.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Club, ClubRole};
use crate::domain::foundation::{AuthorizationResult, OwnedByUser, UserId};

/// Actions a user may attempt against a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubAction {
    View,
    Update,
    Delete,
    Join,
    ManageMembers,
    ManageRoles,
    ManagePosts,
    ManageEvents,
    AccessChat,
    ManageSettings,
}

impl ClubAction {
    pub fn all() -> [ClubAction; 10] {
        use ClubAction::*;
        [
            View,
            Update,
            Delete,
            Join,
            ManageMembers,
            ManageRoles,
            ManagePosts,
            ManageEvents,
            AccessChat,
            ManageSettings,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClubAction::View => "view",
            ClubAction::Update => "update",
            ClubAction::Delete => "delete",
            ClubAction::Join => "join",
            ClubAction::ManageMembers => "manage_members",
            ClubAction::ManageRoles => "manage_roles",
            ClubAction::ManagePosts => "manage_posts",
            ClubAction::ManageEvents => "manage_events",
            ClubAction::AccessChat => "access_chat",
            ClubAction::ManageSettings => "manage_settings",
        }
    }
}

impl fmt::Display for ClubAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authorization facts for one user against one club.
#[derive(Debug, Clone)]
pub struct ClubPolicy<'a> {
    club: &'a Club,
    user_id: &'a UserId,
    role: Option<ClubRole>,
    is_blocked: bool,
}

impl<'a> ClubPolicy<'a> {
    /// `role` is `None` when the user holds no membership row.
    pub fn new(club: &'a Club, user_id: &'a UserId, role: Option<ClubRole>, is_blocked: bool) -> Self {
        Self {
            club,
            user_id,
            role,
            is_blocked,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.club.is_owner(self.user_id)
    }

    /// Owner counts as a member even without a membership row.
    pub fn is_member(&self) -> bool {
        self.is_owner() || self.role.is_some()
    }

    pub fn is_leadership(&self) -> bool {
        self.is_owner() || self.role.map(|r| r.is_leadership()).unwrap_or(false)
    }

    pub fn is_officer(&self) -> bool {
        self.is_owner() || self.role.map(|r| r.is_officer()).unwrap_or(false)
    }

    fn role_allows(&self, capability: fn(&ClubRole) -> bool) -> bool {
        self.is_owner() || self.role.as_ref().map(capability).unwrap_or(false)
    }

    pub fn can_view(&self) -> bool {
        !self.club.is_secret() || self.is_member()
    }

    pub fn can_update(&self) -> bool {
        self.is_leadership()
    }

    pub fn can_delete(&self) -> bool {
        self.is_owner()
    }

    pub fn can_join(&self) -> bool {
        !self.is_blocked && !self.is_member()
    }

    pub fn can_manage_members(&self) -> bool {
        self.role_allows(ClubRole::can_remove_members)
    }

    pub fn can_manage_roles(&self) -> bool {
        self.role_allows(ClubRole::can_manage_roles)
    }

    pub fn can_manage_posts(&self) -> bool {
        self.role_allows(ClubRole::can_delete_posts)
    }

    pub fn can_manage_events(&self) -> bool {
        self.is_officer()
    }

    pub fn can_access_chat(&self) -> bool {
        self.is_member()
    }

    pub fn can_manage_settings(&self) -> bool {
        self.is_leadership()
    }

    /// Resolves a single action to a boolean.
    pub fn allows(&self, action: ClubAction) -> bool {
        match action {
            ClubAction::View => self.can_view(),
            ClubAction::Update => self.can_update(),
            ClubAction::Delete => self.can_delete(),
            ClubAction::Join => self.can_join(),
            ClubAction::ManageMembers => self.can_manage_members(),
            ClubAction::ManageRoles => self.can_manage_roles(),
            ClubAction::ManagePosts => self.can_manage_posts(),
            ClubAction::ManageEvents => self.can_manage_events(),
            ClubAction::AccessChat => self.can_access_chat(),
            ClubAction::ManageSettings => self.can_manage_settings(),
        }
    }

    /// Resolves an action to an [`AuthorizationResult`] carrying the denial reason.
    pub fn authorize(&self, action: ClubAction) -> AuthorizationResult {
        let result = AuthorizationResult::allow(action.as_str(), "Club", self.club.id, self.user_id);
        if self.allows(action) {
            result
        } else {
            result.deny(self.denial_reason(action))
        }
    }

    fn denial_reason(&self, action: ClubAction) -> &'static str {
        match action {
            ClubAction::View => "Secret clubs are visible to members only",
            ClubAction::Delete => "Only the club owner can delete the club",
            ClubAction::Join if self.is_blocked => "User is blocked from this club",
            ClubAction::Join => "User is already a member of this club",
            ClubAction::AccessChat => "Club chat is for members only",
            ClubAction::ManageEvents => "Only club officers can manage events",
            ClubAction::ManagePosts => "Role cannot moderate posts",
            ClubAction::ManageMembers => "Role cannot manage members",
            ClubAction::ManageRoles => "Role cannot manage roles",
            ClubAction::Update | ClubAction::ManageSettings => {
                "Only the owner, president or vice president can do this"
            }
        }
    }
}
