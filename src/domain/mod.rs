//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `club` - Roles, tiers, membership and per-action authorization
//! - `subscription` - Paid club subscription lifecycle and coupons
//! - `user_tier` - Per-user free/pro limits

pub mod club;
pub mod foundation;
pub mod subscription;
pub mod user_tier;
