//! RejectSubscriptionHandler - Admin refusal of a submitted payment.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{
    EventId, SerializableDomainEvent, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::{ClubSubscription, SubscriptionError, SubscriptionRejected};
use crate::ports::{EventPublisher, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct RejectSubscriptionCommand {
    pub subscription_id: SubscriptionId,
    pub admin_id: UserId,
    /// Shown to the club; required.
    pub admin_note: String,
}

#[derive(Debug, Clone)]
pub struct RejectSubscriptionResult {
    pub subscription: ClubSubscription,
    pub event: SubscriptionRejected,
}

pub struct RejectSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RejectSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            subscriptions,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RejectSubscriptionCommand,
    ) -> Result<RejectSubscriptionResult, SubscriptionError> {
        let now = Timestamp::now();

        let mut subscription = self
            .subscriptions
            .find_by_id(&cmd.subscription_id)
            .await?
            .ok_or_else(|| SubscriptionError::not_found(cmd.subscription_id))?;

        let read_as = subscription.status;
        subscription.reject(cmd.admin_id.clone(), cmd.admin_note, now)?;
        self.subscriptions.update(&subscription, read_as).await?;

        let event = SubscriptionRejected {
            event_id: EventId::new(),
            subscription_id: subscription.id,
            club_id: subscription.club_id,
            rejected_by: cmd.admin_id.clone(),
            admin_note: subscription.admin_note.clone().unwrap_or_default(),
            rejected_at: now,
        };
        let envelope = event.to_envelope()?.with_user_id(cmd.admin_id.as_str());
        self.event_publisher.publish(envelope).await?;

        info!(
            subscription_id = %subscription.id,
            club_id = %subscription.club_id,
            "Club subscription rejected"
        );

        Ok(RejectSubscriptionResult {
            subscription,
            event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::application::handlers::test_support::{admin, user, MockEventPublisher};
    use crate::domain::foundation::{ClubId, Money};
    use crate::domain::subscription::{PaymentSubmission, SubscriptionStatus};

    async fn setup() -> (
        Arc<InMemorySubscriptionRepository>,
        Arc<MockEventPublisher>,
        RejectSubscriptionHandler,
        ClubSubscription,
    ) {
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let publisher = Arc::new(MockEventPublisher::new());
        let sub = ClubSubscription::submit(
            PaymentSubmission {
                club_id: ClubId::new(),
                submitted_by: user("owner"),
                original_amount: Money::from_major(500),
                amount: Money::from_major(500),
                coupon_id: None,
                coupon_code: None,
                payment_method: "bank_transfer".to_string(),
                payment_reference: "TX-404".to_string(),
            },
            Timestamp::now(),
        )
        .unwrap();
        subscriptions.save(&sub).await.unwrap();
        let handler = RejectSubscriptionHandler::new(subscriptions.clone(), publisher.clone());
        (subscriptions, publisher, handler, sub)
    }

    #[tokio::test]
    async fn rejection_stores_note_and_publishes() {
        let (subscriptions, publisher, handler, sub) = setup().await;

        let result = handler
            .handle(RejectSubscriptionCommand {
                subscription_id: sub.id,
                admin_id: admin(),
                admin_note: "  Transfer not received  ".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.subscription.status, SubscriptionStatus::Rejected);
        assert_eq!(result.event.admin_note, "Transfer not received");
        let stored = subscriptions.find_by_id(&sub.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SubscriptionStatus::Rejected);
        assert_eq!(publisher.event_types(), vec!["club_subscription.rejected"]);
    }

    #[tokio::test]
    async fn blank_note_is_rejected() {
        let (_, publisher, handler, sub) = setup().await;

        let result = handler
            .handle(RejectSubscriptionCommand {
                subscription_id: sub.id,
                admin_id: admin(),
                admin_note: "   ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(SubscriptionError::ValidationFailed { .. })));
        assert!(publisher.published_events().is_empty());
    }

    #[tokio::test]
    async fn rejected_subscription_cannot_be_rejected_again() {
        let (_, _, handler, sub) = setup().await;
        let cmd = RejectSubscriptionCommand {
            subscription_id: sub.id,
            admin_id: admin(),
            admin_note: "Duplicate".to_string(),
        };
        handler.handle(cmd.clone()).await.unwrap();

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(SubscriptionError::InvalidState { .. })));
    }
}
