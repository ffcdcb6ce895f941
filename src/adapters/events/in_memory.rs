//! In-memory event bus.
//!
//! The worker binary has no broker, so published envelopes are logged
//! through `tracing` and kept in memory. Tests read them back.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

#[derive(Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Everything published so far, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.recorded().clone()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.recorded()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.recorded().len()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::debug!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            "Event published"
        );

        self.published
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "Event bus lock poisoned"))?
            .push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EventId, EventMetadata, Timestamp};
    use serde_json::json;

    fn envelope(event_type: &str, subscription: &str) -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new(),
            event_type: event_type.to_string(),
            aggregate_id: subscription.to_string(),
            aggregate_type: "ClubSubscription".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({}),
            metadata: EventMetadata::default(),
        }
    }

    #[tokio::test]
    async fn keeps_events_in_publish_order() {
        let bus = InMemoryEventBus::new();
        for (event_type, sub) in [
            ("club_subscription.submitted", "sub-1"),
            ("club_subscription.approved", "sub-1"),
            ("club_subscription.submitted", "sub-2"),
        ] {
            bus.publish(envelope(event_type, sub)).await.unwrap();
        }

        let order: Vec<(String, String)> = bus
            .published_events()
            .into_iter()
            .map(|e| (e.event_type, e.aggregate_id))
            .collect();
        assert_eq!(
            order,
            vec![
                ("club_subscription.submitted".to_string(), "sub-1".to_string()),
                ("club_subscription.approved".to_string(), "sub-1".to_string()),
                ("club_subscription.submitted".to_string(), "sub-2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn filters_by_event_type() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("club_subscription.expired", "sub-1"))
            .await
            .unwrap();
        bus.publish(envelope("club_subscription.cancelled", "sub-2"))
            .await
            .unwrap();

        assert_eq!(bus.event_count(), 2);
        assert_eq!(bus.events_of_type("club_subscription.expired").len(), 1);
        assert!(bus.events_of_type("club_subscription.rejected").is_empty());
    }
}
