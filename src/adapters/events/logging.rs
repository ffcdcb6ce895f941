//! Log-only event publisher for the worker binary.
//!
//! The worker has no broker and nothing reads events back, so each
//! envelope becomes one structured `info` line and is then dropped.

use async_trait::async_trait;
use tracing::info;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventPublisher;

impl LoggingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        info!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            aggregate_type = %event.aggregate_type,
            aggregate_id = %event.aggregate_id,
            occurred_at = %event.occurred_at,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            user_id = event.metadata.user_id.as_deref().unwrap_or("-"),
            "Domain event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::application::{ExpireSubscriptionsCommand, ExpireSubscriptionsHandler};
    use crate::domain::foundation::{ClubId, EventId, EventMetadata, Money, Timestamp, UserId};
    use crate::domain::subscription::{ClubSubscription, PaymentSubmission};
    use crate::ports::SubscriptionRepository;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn publish_accepts_and_keeps_nothing() {
        let publisher = LoggingEventPublisher::new();
        let envelope = EventEnvelope {
            event_id: EventId::new(),
            event_type: "club_subscription.expired".to_string(),
            aggregate_id: "sub-1".to_string(),
            aggregate_type: "ClubSubscription".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({}),
            metadata: EventMetadata::default(),
        };

        for _ in 0..1_000 {
            publisher.publish(envelope.clone()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn sweep_runs_against_the_logging_publisher() {
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let now = Timestamp::now();
        let mut sub = ClubSubscription::submit(
            PaymentSubmission {
                club_id: ClubId::new(),
                submitted_by: UserId::new("owner").unwrap(),
                original_amount: Money::from_major(500),
                amount: Money::from_major(500),
                coupon_id: None,
                coupon_code: None,
                payment_method: "bank_transfer".to_string(),
                payment_reference: "TX-9".to_string(),
            },
            now.minus_days(40),
        )
        .unwrap();
        sub.approve(
            UserId::new("admin-1").unwrap(),
            now.minus_days(40),
            now.minus_days(10),
            now.minus_days(40),
        )
        .unwrap();
        subscriptions.save(&sub).await.unwrap();

        let handler =
            ExpireSubscriptionsHandler::new(subscriptions, Arc::new(LoggingEventPublisher::new()));
        let result = handler.handle(ExpireSubscriptionsCommand { now }).await.unwrap();
        assert_eq!(result.expired_count, 1);
    }
}
