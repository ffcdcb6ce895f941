//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the event
//! plumbing that form the vocabulary of the motorclub domain.

mod authorization;
mod errors;
mod events;
mod ids;
mod money;
mod ownership;
mod percentage;
mod state_machine;
mod timestamp;

pub use authorization::AuthorizationResult;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventMetadata, SerializableDomainEvent};
pub use ids::{ClubId, ClubMemberId, CouponId, EventId, SubscriptionId, UserId};
pub use money::Money;
pub use ownership::OwnedByUser;
pub use percentage::Percentage;
pub use state_machine::{InvalidTransition, StateMachine};
pub use timestamp::Timestamp;
