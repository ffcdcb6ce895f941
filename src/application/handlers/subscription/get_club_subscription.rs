//! GetClubSubscriptionHandler - Query for a club's current subscription.

use std::sync::Arc;

use crate::domain::foundation::{ClubId, Timestamp};
use crate::domain::subscription::{ClubSubscription, SubscriptionError, SubscriptionStatus};
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone)]
pub struct GetClubSubscriptionQuery {
    pub club_id: ClubId,
}

/// A club's latest subscription as access decisions see it.
#[derive(Debug, Clone)]
pub struct GetClubSubscriptionResult {
    pub subscription: ClubSubscription,
    /// `expired` for an active row past its end, even before the sweep.
    pub effective_status: SubscriptionStatus,
    pub is_active: bool,
    pub days_remaining: i64,
}

pub struct GetClubSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetClubSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        query: GetClubSubscriptionQuery,
    ) -> Result<GetClubSubscriptionResult, SubscriptionError> {
        let now = Timestamp::now();
        let subscription = self
            .subscriptions
            .find_latest_for_club(&query.club_id)
            .await?
            .ok_or_else(|| SubscriptionError::none_for_club(query.club_id))?;

        Ok(GetClubSubscriptionResult {
            effective_status: subscription.effective_status(now),
            is_active: subscription.is_active(now),
            days_remaining: subscription.days_remaining(now),
            subscription,
        })
    }
}
