//! CancelSubscriptionHandler - Ends a club's active subscription early.
//!
//! The club drops back to the free tier immediately.

use std::sync::Arc;
use tracing::info;

use crate::domain::club::{ClubAction, ClubPolicy, ClubTier};
use crate::domain::foundation::{ClubId, EventId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::subscription::{ClubSubscription, SubscriptionCancelled, SubscriptionError};
use crate::ports::{ClubRepository, EventPublisher, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub club_id: ClubId,
    pub user_id: UserId,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CancelSubscriptionResult {
    pub subscription: ClubSubscription,
    pub event: SubscriptionCancelled,
}

pub struct CancelSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    clubs: Arc<dyn ClubRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        clubs: Arc<dyn ClubRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            subscriptions,
            clubs,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<CancelSubscriptionResult, SubscriptionError> {
        let now = Timestamp::now();

        // 1. Authorize against the club
        let club = self
            .clubs
            .find_by_id(&cmd.club_id)
            .await?
            .ok_or_else(|| SubscriptionError::club_not_found(cmd.club_id))?;
        let member = self.clubs.find_member(&club.id, &cmd.user_id).await?;
        let blocked = self.clubs.is_blocked(&club.id, &cmd.user_id).await?;
        ClubPolicy::new(&club, &cmd.user_id, member.map(|m| m.role), blocked)
            .authorize(ClubAction::ManageSettings)
            .into_result()?;

        // 2. Cancel the open subscription (domain rejects pending ones)
        let mut subscription = self
            .subscriptions
            .find_open_for_club(&club.id)
            .await?
            .ok_or_else(|| SubscriptionError::none_for_club(club.id))?;
        let read_as = subscription.status;
        subscription.cancel(cmd.note, now)?;

        // 3. Persist and demote
        self.subscriptions.update(&subscription, read_as).await?;
        self.clubs.set_tier(&club.id, ClubTier::Free).await?;

        // 4. Publish
        let event = SubscriptionCancelled {
            event_id: EventId::new(),
            subscription_id: subscription.id,
            club_id: club.id,
            cancelled_by: cmd.user_id.clone(),
            cancelled_at: now,
        };
        let envelope = event.to_envelope()?.with_user_id(cmd.user_id.as_str());
        self.event_publisher.publish(envelope).await?;

        info!(
            subscription_id = %subscription.id,
            club_id = %club.id,
            "Club subscription cancelled"
        );

        Ok(CancelSubscriptionResult {
            subscription,
            event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryClubRepository, InMemorySubscriptionRepository};
    use crate::application::handlers::test_support::{
        admin, member, seeded_club, user, MockEventPublisher,
    };
    use crate::domain::club::{Club, ClubRole};
    use crate::domain::foundation::Money;
    use crate::domain::subscription::{PaymentSubmission, SubscriptionStatus};

    struct Fixture {
        clubs: Arc<InMemoryClubRepository>,
        subscriptions: Arc<InMemorySubscriptionRepository>,
        publisher: Arc<MockEventPublisher>,
        handler: CancelSubscriptionHandler,
        club: Club,
    }

    async fn fixture() -> Fixture {
        let clubs = Arc::new(InMemoryClubRepository::new());
        let club = seeded_club(&clubs, ClubTier::Pro).await;
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let publisher = Arc::new(MockEventPublisher::new());
        let handler =
            CancelSubscriptionHandler::new(subscriptions.clone(), clubs.clone(), publisher.clone());
        Fixture {
            clubs,
            subscriptions,
            publisher,
            handler,
            club,
        }
    }

    async fn store(f: &Fixture, approve: bool) -> ClubSubscription {
        let now = Timestamp::now();
        let mut sub = ClubSubscription::submit(
            PaymentSubmission {
                club_id: f.club.id,
                submitted_by: user("owner"),
                original_amount: Money::from_major(500),
                amount: Money::from_major(500),
                coupon_id: None,
                coupon_code: None,
                payment_method: "bank_transfer".to_string(),
                payment_reference: "TX-9".to_string(),
            },
            now,
        )
        .unwrap();
        if approve {
            sub.approve(admin(), now, now.add_days(30), now).unwrap();
        }
        f.subscriptions.save(&sub).await.unwrap();
        sub
    }

    fn command(club_id: ClubId, user_id: &str) -> CancelSubscriptionCommand {
        CancelSubscriptionCommand {
            club_id,
            user_id: user(user_id),
            note: Some("Club is disbanding".to_string()),
        }
    }

    #[tokio::test]
    async fn cancel_demotes_club_and_publishes() {
        let f = fixture().await;
        let sub = store(&f, true).await;

        let result = f.handler.handle(command(f.club.id, "owner")).await.unwrap();

        assert_eq!(result.subscription.status, SubscriptionStatus::Cancelled);
        assert_eq!(result.subscription.admin_note.as_deref(), Some("Club is disbanding"));
        assert!(!result.subscription.is_active(Timestamp::now()));
        let stored = f.subscriptions.find_by_id(&sub.id).await.unwrap().unwrap();
        assert!(stored.cancelled_at.is_some());
        assert_eq!(f.clubs.tier_of(&f.club.id).await, Some(ClubTier::Free));
        assert_eq!(f.publisher.event_types(), vec!["club_subscription.cancelled"]);
    }

    #[tokio::test]
    async fn pending_subscription_cannot_be_cancelled() {
        let f = fixture().await;
        store(&f, false).await;

        let result = f.handler.handle(command(f.club.id, "owner")).await;
        assert!(matches!(result, Err(SubscriptionError::InvalidState { .. })));
        assert_eq!(f.clubs.tier_of(&f.club.id).await, Some(ClubTier::Pro));
    }

    #[tokio::test]
    async fn no_open_subscription_is_reported() {
        let f = fixture().await;
        let result = f.handler.handle(command(f.club.id, "owner")).await;
        assert_eq!(result.unwrap_err(), SubscriptionError::none_for_club(f.club.id));
    }

    #[tokio::test]
    async fn officers_below_leadership_are_forbidden() {
        let f = fixture().await;
        store(&f, true).await;
        f.clubs
            .insert_member(member(&f.club, "treasurer", ClubRole::Treasurer))
            .await;

        let result = f.handler.handle(command(f.club.id, "treasurer")).await;
        assert!(matches!(result, Err(SubscriptionError::Forbidden(_))));
    }
}
