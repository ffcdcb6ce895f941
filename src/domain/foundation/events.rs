//! Domain events and their transport envelope.
//!
//! Aggregates describe what happened as plain serde structs. The
//! `domain_event!` macro wires a struct to [`DomainEvent`] by naming its
//! fields, and [`SerializableDomainEvent::to_envelope`] turns it into an
//! [`EventEnvelope`] that an `EventPublisher` can route on `event_type`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{DomainError, ErrorCode, EventId, Timestamp};

/// Routing facts every domain event exposes.
pub trait DomainEvent: Send + Sync {
    /// Dotted, stable name such as `club_subscription.approved`.
    fn event_type(&self) -> &'static str;

    fn aggregate_id(&self) -> String;

    fn aggregate_type(&self) -> &'static str;

    fn occurred_at(&self) -> Timestamp;

    fn event_id(&self) -> EventId;
}

/// Envelope conversion, available to any event that serializes.
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    fn to_envelope(&self) -> Result<EventEnvelope, DomainError> {
        let payload = serde_json::to_value(self).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize {}: {}", self.event_type(), e),
            )
            .with_detail("event_id", self.event_id().to_string())
        })?;

        Ok(EventEnvelope {
            event_id: self.event_id(),
            event_type: self.event_type().to_string(),
            aggregate_id: self.aggregate_id(),
            aggregate_type: self.aggregate_type().to_string(),
            occurred_at: self.occurred_at(),
            payload,
            metadata: EventMetadata::default(),
        })
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Implements [`DomainEvent`] for a struct by naming its fields.
///
/// ```ignore
/// domain_event!(
///     SubscriptionApproved,
///     event_type = "club_subscription.approved",
///     aggregate_id = subscription_id,
///     aggregate_type = "ClubSubscription",
///     occurred_at = approved_at,
///     event_id = event_id
/// );
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event:ident,
        event_type = $event_type:expr,
        aggregate_id = $aggregate_id:ident,
        aggregate_type = $aggregate_type:expr,
        occurred_at = $occurred_at:ident,
        event_id = $event_id:ident
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event {
            fn event_type(&self) -> &'static str {
                $event_type
            }

            fn aggregate_id(&self) -> String {
                self.$aggregate_id.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                $aggregate_type
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$occurred_at
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.$event_id
            }
        }
    };
}

/// Who caused an event and which run or request it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Shared by every event of one request or sweep run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// A serialized domain event ready for publishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub event_type: String,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,
    pub payload: JsonValue,
    pub metadata: EventMetadata,
}

impl EventEnvelope {
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.user_id = Some(id.into());
        self
    }

    /// Decodes the payload back into a concrete event.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}
