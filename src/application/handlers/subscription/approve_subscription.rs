//! ApproveSubscriptionHandler - Admin verification of a submitted payment.

use std::sync::Arc;
use tracing::info;

use crate::application::SettingsStore;
use crate::domain::club::ClubTier;
use crate::domain::foundation::{
    EventId, SerializableDomainEvent, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::{ClubSubscription, SubscriptionApproved, SubscriptionError};
use crate::ports::{ClubRepository, EventPublisher, SubscriptionRepository};

/// Command to approve a pending subscription.
///
/// The period defaults to starting now and lasting the configured number
/// of days.
#[derive(Debug, Clone)]
pub struct ApproveSubscriptionCommand {
    pub subscription_id: SubscriptionId,
    pub admin_id: UserId,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct ApproveSubscriptionResult {
    pub subscription: ClubSubscription,
    pub event: SubscriptionApproved,
}

pub struct ApproveSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    clubs: Arc<dyn ClubRepository>,
    settings: Arc<SettingsStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ApproveSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        clubs: Arc<dyn ClubRepository>,
        settings: Arc<SettingsStore>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            subscriptions,
            clubs,
            settings,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApproveSubscriptionCommand,
    ) -> Result<ApproveSubscriptionResult, SubscriptionError> {
        let now = Timestamp::now();

        let mut subscription = self
            .subscriptions
            .find_by_id(&cmd.subscription_id)
            .await?
            .ok_or_else(|| SubscriptionError::not_found(cmd.subscription_id))?;

        let starts_at = cmd.starts_at.unwrap_or(now);
        let ends_at = match cmd.ends_at {
            Some(ends_at) => ends_at,
            None => starts_at.add_days(self.settings.club_pro_duration_days().await?),
        };

        let read_as = subscription.status;
        subscription.approve(cmd.admin_id.clone(), starts_at, ends_at, now)?;
        self.subscriptions.update(&subscription, read_as).await?;
        // A backdated period that already ended stays free; the sweep closes it.
        if subscription.is_active(now) {
            self.clubs.set_tier(&subscription.club_id, ClubTier::Pro).await?;
        }

        let event = SubscriptionApproved {
            event_id: EventId::new(),
            subscription_id: subscription.id,
            club_id: subscription.club_id,
            verified_by: cmd.admin_id.clone(),
            starts_at,
            ends_at,
            approved_at: now,
        };
        let envelope = event.to_envelope()?.with_user_id(cmd.admin_id.as_str());
        self.event_publisher.publish(envelope).await?;

        info!(
            subscription_id = %subscription.id,
            club_id = %subscription.club_id,
            ends_at = %ends_at,
            "Club subscription approved"
        );

        Ok(ApproveSubscriptionResult {
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
        admin, seeded_club, settings, user, MockEventPublisher,
    };
    use crate::domain::club::Club;
    use crate::domain::foundation::Money;
    use crate::domain::subscription::{PaymentSubmission, SubscriptionStatus};

    struct Fixture {
        clubs: Arc<InMemoryClubRepository>,
        subscriptions: Arc<InMemorySubscriptionRepository>,
        publisher: Arc<MockEventPublisher>,
        handler: ApproveSubscriptionHandler,
        club: Club,
    }

    async fn fixture() -> Fixture {
        let clubs = Arc::new(InMemoryClubRepository::new());
        let club = seeded_club(&clubs, ClubTier::Free).await;
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = ApproveSubscriptionHandler::new(
            subscriptions.clone(),
            clubs.clone(),
            settings(),
            publisher.clone(),
        );
        Fixture {
            clubs,
            subscriptions,
            publisher,
            handler,
            club,
        }
    }

    async fn pending(f: &Fixture) -> ClubSubscription {
        let sub = ClubSubscription::submit(
            PaymentSubmission {
                club_id: f.club.id,
                submitted_by: user("owner"),
                original_amount: Money::from_major(500),
                amount: Money::from_major(500),
                coupon_id: None,
                coupon_code: None,
                payment_method: "bank_transfer".to_string(),
                payment_reference: "TX-1".to_string(),
            },
            Timestamp::now(),
        )
        .unwrap();
        f.subscriptions.save(&sub).await.unwrap();
        sub
    }

    fn command(id: SubscriptionId) -> ApproveSubscriptionCommand {
        ApproveSubscriptionCommand {
            subscription_id: id,
            admin_id: admin(),
            starts_at: None,
            ends_at: None,
        }
    }

    #[tokio::test]
    async fn approval_activates_and_promotes_club() {
        let f = fixture().await;
        let sub = pending(&f).await;

        let result = f.handler.handle(command(sub.id)).await.unwrap();

        assert_eq!(result.subscription.status, SubscriptionStatus::Active);
        assert!(result.subscription.is_active(Timestamp::now()));
        assert_eq!(result.subscription.verified_by, Some(admin()));
        assert_eq!(f.clubs.tier_of(&f.club.id).await, Some(ClubTier::Pro));
        assert_eq!(f.publisher.event_types(), vec!["club_subscription.approved"]);
    }

    #[tokio::test]
    async fn default_period_uses_configured_duration() {
        let f = fixture().await;
        let sub = pending(&f).await;
        let starts_at = Timestamp::now();

        let result = f
            .handler
            .handle(ApproveSubscriptionCommand {
                starts_at: Some(starts_at),
                ..command(sub.id)
            })
            .await
            .unwrap();

        assert_eq!(result.subscription.starts_at, Some(starts_at));
        assert_eq!(result.subscription.ends_at, Some(starts_at.add_days(30)));
    }

    #[tokio::test]
    async fn explicit_period_is_kept() {
        let f = fixture().await;
        let sub = pending(&f).await;
        let starts_at = Timestamp::now();
        let ends_at = starts_at.add_days(365);

        let result = f
            .handler
            .handle(ApproveSubscriptionCommand {
                starts_at: Some(starts_at),
                ends_at: Some(ends_at),
                ..command(sub.id)
            })
            .await
            .unwrap();

        assert_eq!(result.event.ends_at, ends_at);
    }

    #[tokio::test]
    async fn lapsed_period_is_recorded_without_promotion() {
        let f = fixture().await;
        let sub = pending(&f).await;
        let now = Timestamp::now();

        let result = f
            .handler
            .handle(ApproveSubscriptionCommand {
                starts_at: Some(now.minus_days(31)),
                ends_at: Some(now.minus_days(1)),
                ..command(sub.id)
            })
            .await
            .unwrap();

        assert_eq!(result.subscription.status, SubscriptionStatus::Active);
        assert!(!result.subscription.is_active(now));
        assert_eq!(f.clubs.tier_of(&f.club.id).await, Some(ClubTier::Free));
        assert_eq!(f.publisher.event_types(), vec!["club_subscription.approved"]);
    }

    #[tokio::test]
    async fn inverted_period_is_rejected() {
        let f = fixture().await;
        let sub = pending(&f).await;
        let starts_at = Timestamp::now();

        let result = f
            .handler
            .handle(ApproveSubscriptionCommand {
                starts_at: Some(starts_at),
                ends_at: Some(starts_at.minus_days(1)),
                ..command(sub.id)
            })
            .await;

        assert!(matches!(result, Err(SubscriptionError::ValidationFailed { .. })));
        assert_eq!(f.clubs.tier_of(&f.club.id).await, Some(ClubTier::Free));
        assert!(f.publisher.published_events().is_empty());
    }

    #[tokio::test]
    async fn approving_twice_is_invalid_state() {
        let f = fixture().await;
        let sub = pending(&f).await;
        f.handler.handle(command(sub.id)).await.unwrap();

        let result = f.handler.handle(command(sub.id)).await;
        assert!(matches!(result, Err(SubscriptionError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn unknown_subscription_is_not_found() {
        let f = fixture().await;
        let id = SubscriptionId::new();
        let result = f.handler.handle(command(id)).await;
        assert_eq!(result.unwrap_err(), SubscriptionError::not_found(id));
    }
}
