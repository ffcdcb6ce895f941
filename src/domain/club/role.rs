//! Club officer roles.
//!
//! Every member of a club holds exactly one role. Roles carry a fixed
//! rank (1 = highest authority) and a set of capability flags that the
//! authorization policy composes into per-action checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Role held by a member within a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubRole {
    President,
    VicePresident,
    Secretary,
    Treasurer,
    RoadCaptain,
    Moderator,
    Member,
}

impl ClubRole {
    /// All roles, from highest authority to lowest.
    pub fn all() -> [ClubRole; 7] {
        use ClubRole::*;
        [
            President,
            VicePresident,
            Secretary,
            Treasurer,
            RoadCaptain,
            Moderator,
            Member,
        ]
    }

    /// Returns the rank of this role. Lower is more senior.
    ///
    /// | Role | Rank |
    /// |------|------|
    /// | President | 1 |
    /// | Vice President | 2 |
    /// | Secretary, Treasurer | 3 |
    /// | Road Captain, Moderator | 4 |
    /// | Member | 5 |
    pub fn rank(&self) -> u8 {
        match self {
            ClubRole::President => 1,
            ClubRole::VicePresident => 2,
            ClubRole::Secretary | ClubRole::Treasurer => 3,
            ClubRole::RoadCaptain | ClubRole::Moderator => 4,
            ClubRole::Member => 5,
        }
    }

    /// Returns true if this role is strictly more senior than `other`.
    pub fn outranks(&self, other: &ClubRole) -> bool {
        self.rank() < other.rank()
    }

    /// Returns true for every role except plain member.
    pub fn is_officer(&self) -> bool {
        !matches!(self, ClubRole::Member)
    }

    /// President or vice president.
    pub fn is_leadership(&self) -> bool {
        matches!(self, ClubRole::President | ClubRole::VicePresident)
    }

    pub fn can_delete_posts(&self) -> bool {
        matches!(
            self,
            ClubRole::President | ClubRole::VicePresident | ClubRole::Moderator
        )
    }

    pub fn can_mute_users(&self) -> bool {
        matches!(
            self,
            ClubRole::President | ClubRole::VicePresident | ClubRole::Moderator
        )
    }

    pub fn can_remove_members(&self) -> bool {
        self.is_leadership()
    }

    pub fn can_manage_roles(&self) -> bool {
        self.is_leadership()
    }

    pub fn can_pin_posts(&self) -> bool {
        self.is_officer()
    }

    pub fn can_block_users(&self) -> bool {
        self.is_leadership()
    }

    /// Roles this role may hand out: every role strictly junior to it,
    /// and nothing at all unless it can manage roles.
    pub fn assignable_roles(&self) -> Vec<ClubRole> {
        if !self.can_manage_roles() {
            return Vec::new();
        }
        Self::all()
            .into_iter()
            .filter(|role| self.outranks(role))
            .collect()
    }

    /// Returns the persisted string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubRole::President => "president",
            ClubRole::VicePresident => "vice_president",
            ClubRole::Secretary => "secretary",
            ClubRole::Treasurer => "treasurer",
            ClubRole::RoadCaptain => "road_captain",
            ClubRole::Moderator => "moderator",
            ClubRole::Member => "member",
        }
    }

    /// Returns the human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ClubRole::President => "President",
            ClubRole::VicePresident => "Vice President",
            ClubRole::Secretary => "Secretary",
            ClubRole::Treasurer => "Treasurer",
            ClubRole::RoadCaptain => "Road Captain",
            ClubRole::Moderator => "Moderator",
            ClubRole::Member => "Member",
        }
    }
}

impl fmt::Display for ClubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClubRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("club_role", format!("unknown role '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ════════════════════════════════════════════════════════════════════════════
    // Ranks
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn ranks_match_table() {
        assert_eq!(ClubRole::President.rank(), 1);
        assert_eq!(ClubRole::VicePresident.rank(), 2);
        assert_eq!(ClubRole::Secretary.rank(), 3);
        assert_eq!(ClubRole::Treasurer.rank(), 3);
        assert_eq!(ClubRole::RoadCaptain.rank(), 4);
        assert_eq!(ClubRole::Moderator.rank(), 4);
        assert_eq!(ClubRole::Member.rank(), 5);
    }

    #[test]
    fn equal_ranks_do_not_outrank_each_other() {
        assert!(!ClubRole::Secretary.outranks(&ClubRole::Treasurer));
        assert!(!ClubRole::Treasurer.outranks(&ClubRole::Secretary));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Capabilities
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn moderator_can_moderate_but_not_manage() {
        let role = ClubRole::Moderator;
        assert!(role.can_delete_posts());
        assert!(role.can_mute_users());
        assert!(role.can_pin_posts());
        assert!(!role.can_remove_members());
        assert!(!role.can_manage_roles());
        assert!(!role.can_block_users());
    }

    #[test]
    fn treasurer_can_only_pin() {
        let role = ClubRole::Treasurer;
        assert!(role.can_pin_posts());
        assert!(!role.can_delete_posts());
        assert!(!role.can_mute_users());
        assert!(!role.can_manage_roles());
    }

    #[test]
    fn member_has_no_capabilities() {
        let role = ClubRole::Member;
        assert!(!role.is_officer());
        assert!(!role.can_delete_posts());
        assert!(!role.can_mute_users());
        assert!(!role.can_remove_members());
        assert!(!role.can_manage_roles());
        assert!(!role.can_pin_posts());
        assert!(!role.can_block_users());
    }

    #[test]
    fn vice_president_has_every_capability() {
        let role = ClubRole::VicePresident;
        assert!(role.can_delete_posts());
        assert!(role.can_mute_users());
        assert!(role.can_remove_members());
        assert!(role.can_manage_roles());
        assert!(role.can_pin_posts());
        assert!(role.can_block_users());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assignable roles
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn member_can_assign_nothing() {
        assert!(ClubRole::Member.assignable_roles().is_empty());
    }

    #[test]
    fn president_can_assign_every_junior_role() {
        assert_eq!(
            ClubRole::President.assignable_roles(),
            vec![
                ClubRole::VicePresident,
                ClubRole::Secretary,
                ClubRole::Treasurer,
                ClubRole::RoadCaptain,
                ClubRole::Moderator,
                ClubRole::Member,
            ]
        );
    }

    #[test]
    fn vice_president_cannot_assign_vice_president() {
        let roles = ClubRole::VicePresident.assignable_roles();
        assert!(!roles.contains(&ClubRole::VicePresident));
        assert!(!roles.contains(&ClubRole::President));
        assert!(roles.contains(&ClubRole::Secretary));
    }

    #[test]
    fn officers_without_manage_roles_assign_nothing() {
        assert!(ClubRole::Secretary.assignable_roles().is_empty());
        assert!(ClubRole::Moderator.assignable_roles().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Persistence
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn parses_persisted_strings() {
        for role in ClubRole::all() {
            assert_eq!(role.as_str().parse::<ClubRole>(), Ok(role));
        }
    }

    #[test]
    fn rejects_unknown_role() {
        assert!("captain".parse::<ClubRole>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&ClubRole::RoadCaptain).unwrap();
        assert_eq!(json, "\"road_captain\"");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Properties
    // ════════════════════════════════════════════════════════════════════════════

    fn any_role() -> impl Strategy<Value = ClubRole> {
        prop::sample::select(ClubRole::all().to_vec())
    }

    proptest! {
        #[test]
        fn outranks_is_irreflexive(a in any_role()) {
            prop_assert!(!a.outranks(&a));
        }

        #[test]
        fn outranks_is_antisymmetric(a in any_role(), b in any_role()) {
            prop_assert!(!(a.outranks(&b) && b.outranks(&a)));
        }

        #[test]
        fn outranks_is_transitive(a in any_role(), b in any_role(), c in any_role()) {
            if a.outranks(&b) && b.outranks(&c) {
                prop_assert!(a.outranks(&c));
            }
        }

        #[test]
        fn rank_ordering_is_total(a in any_role(), b in any_role()) {
            let comparable = a.outranks(&b) || b.outranks(&a) || a.rank() == b.rank();
            prop_assert!(comparable);
        }

        #[test]
        fn assignable_roles_are_strictly_junior(a in any_role()) {
            for assigned in a.assignable_roles() {
                prop_assert!(a.outranks(&assigned));
            }
        }
    }
}
