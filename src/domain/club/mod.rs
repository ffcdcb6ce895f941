//! Club module - roles, tiers, membership and per-action authorization.

mod aggregate;
mod errors;
mod member;
mod policy;
mod role;
mod tier;
mod tier_limits;

pub use aggregate::{Club, ClubType};
pub use errors::ClubError;
pub use member::ClubMember;
pub use policy::{ClubAction, ClubPolicy};
pub use role::ClubRole;
pub use tier::ClubTier;
pub use tier_limits::{ClubTierLimits, UNBOUNDED};
