//! Club subscription repository port.
//!
//! Implementations must enforce at most one open (pending or active)
//! subscription per club.

use crate::domain::foundation::{ClubId, DomainError, SubscriptionId, Timestamp};
use crate::domain::subscription::{ClubSubscription, SubscriptionStatus};
use async_trait::async_trait;

/// A row moved to `expired` by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiredSubscription {
    pub subscription_id: SubscriptionId,
    pub club_id: ClubId,
}

/// Repository port for ClubSubscription persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Save a new subscription.
    ///
    /// # Errors
    ///
    /// - `SubscriptionAlreadyOpen` if the club already has an open subscription
    /// - `DatabaseError` on persistence failure
    async fn save(&self, subscription: &ClubSubscription) -> Result<(), DomainError>;

    /// Write back a subscription read while its stored status was `expected`.
    ///
    /// The write only lands if the stored status is still `expected`, so a
    /// stale copy never overwrites a transition committed in between.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    /// - `InvalidStateTransition` if the stored status is no longer `expected`
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        subscription: &ClubSubscription,
        expected: SubscriptionStatus,
    ) -> Result<(), DomainError>;

    /// Find a subscription by its ID.
    async fn find_by_id(&self, id: &SubscriptionId)
        -> Result<Option<ClubSubscription>, DomainError>;

    /// Find the club's pending or active subscription, if any.
    async fn find_open_for_club(
        &self,
        club_id: &ClubId,
    ) -> Result<Option<ClubSubscription>, DomainError>;

    /// Find the club's most recently created subscription, in any status.
    async fn find_latest_for_club(
        &self,
        club_id: &ClubId,
    ) -> Result<Option<ClubSubscription>, DomainError>;

    /// Moves every active subscription with `ends_at <= now` to `expired`
    /// and demotes the affected clubs to the free tier.
    ///
    /// Returns the rows this call changed. Concurrent and repeated calls
    /// never report the same row twice.
    async fn expire_overdue(&self, now: Timestamp) -> Result<Vec<ExpiredSubscription>, DomainError>;
}
