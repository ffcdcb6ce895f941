//! ExpireSubscriptionsHandler - The expiry sweep.
//!
//! Moves every active subscription past its `ends_at` to `expired`, demotes
//! the affected clubs and publishes one `club_subscription.expired` event
//! per row. Safe to run concurrently and repeatedly.
//!
//! Events from one run share a `sweep-<uuid>` correlation id.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::foundation::{SerializableDomainEvent, Timestamp};
use crate::domain::subscription::{SubscriptionError, SubscriptionExpired};
use crate::ports::{EventPublisher, SubscriptionRepository};

#[derive(Debug, Clone, Copy)]
pub struct ExpireSubscriptionsCommand {
    pub now: Timestamp,
}

impl Default for ExpireSubscriptionsCommand {
    fn default() -> Self {
        Self {
            now: Timestamp::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpireSubscriptionsResult {
    /// Rows this run moved to `expired`.
    pub expired_count: usize,
}

pub struct ExpireSubscriptionsHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ExpireSubscriptionsHandler {
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
        cmd: ExpireSubscriptionsCommand,
    ) -> Result<ExpireSubscriptionsResult, SubscriptionError> {
        let expired = self.subscriptions.expire_overdue(cmd.now).await?;
        let run_id = format!("sweep-{}", Uuid::new_v4());

        // The rows are already committed; a failed publish must not hide that.
        for row in &expired {
            let event = SubscriptionExpired::new(row.subscription_id, row.club_id, cmd.now);
            let published = match event.to_envelope() {
                Ok(envelope) => {
                    let envelope = envelope.with_correlation_id(run_id.as_str());
                    self.event_publisher.publish(envelope).await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = published {
                warn!(
                    subscription_id = %row.subscription_id,
                    error = %e,
                    "Failed to publish subscription expiry"
                );
            }
        }

        if !expired.is_empty() {
            info!(
                count = expired.len(),
                run_id = %run_id,
                "Expired overdue club subscriptions"
            );
        }

        Ok(ExpireSubscriptionsResult {
            expired_count: expired.len(),
        })
    }
}
