//! Club handlers.
//!
//! ## Commands
//! - Assigning officer roles within tier caps
//!
//! ## Queries
//! - Per-action authorization for a user in a club

mod assign_role;
mod authorize_club_action;

pub use assign_role::{AssignRoleCommand, AssignRoleHandler, AssignRoleResult};
pub use authorize_club_action::{AuthorizeClubActionHandler, AuthorizeClubActionQuery};
