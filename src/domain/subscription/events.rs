//! Club subscription domain events.
//!
//! Every lifecycle transition emits exactly one event. Event types are
//! stable strings consumers route on.

use crate::domain::foundation::{ClubId, EventId, Money, SubscriptionId, Timestamp, UserId};
use crate::domain_event;
use serde::{Deserialize, Serialize};

use super::ClubSubscription;

/// Payment submitted; awaiting verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSubmitted {
    pub event_id: EventId,
    pub subscription_id: SubscriptionId,
    pub club_id: ClubId,
    pub submitted_by: UserId,
    pub amount: Money,
    pub original_amount: Money,
    pub coupon_code: Option<String>,
    pub submitted_at: Timestamp,
}

domain_event!(
    SubscriptionSubmitted,
    event_type = "club_subscription.submitted",
    aggregate_id = subscription_id,
    aggregate_type = "ClubSubscription",
    occurred_at = submitted_at,
    event_id = event_id
);

/// Admin verified the payment; the club is now pro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionApproved {
    pub event_id: EventId,
    pub subscription_id: SubscriptionId,
    pub club_id: ClubId,
    pub verified_by: UserId,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub approved_at: Timestamp,
}

domain_event!(
    SubscriptionApproved,
    event_type = "club_subscription.approved",
    aggregate_id = subscription_id,
    aggregate_type = "ClubSubscription",
    occurred_at = approved_at,
    event_id = event_id
);

/// Admin refused the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRejected {
    pub event_id: EventId,
    pub subscription_id: SubscriptionId,
    pub club_id: ClubId,
    pub rejected_by: UserId,
    pub admin_note: String,
    pub rejected_at: Timestamp,
}

domain_event!(
    SubscriptionRejected,
    event_type = "club_subscription.rejected",
    aggregate_id = subscription_id,
    aggregate_type = "ClubSubscription",
    occurred_at = rejected_at,
    event_id = event_id
);

/// Active subscription ended early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCancelled {
    pub event_id: EventId,
    pub subscription_id: SubscriptionId,
    pub club_id: ClubId,
    pub cancelled_by: UserId,
    pub cancelled_at: Timestamp,
}

domain_event!(
    SubscriptionCancelled,
    event_type = "club_subscription.cancelled",
    aggregate_id = subscription_id,
    aggregate_type = "ClubSubscription",
    occurred_at = cancelled_at,
    event_id = event_id
);

/// Paid period ended; set by the expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionExpired {
    pub event_id: EventId,
    pub subscription_id: SubscriptionId,
    pub club_id: ClubId,
    pub expired_at: Timestamp,
}

domain_event!(
    SubscriptionExpired,
    event_type = "club_subscription.expired",
    aggregate_id = subscription_id,
    aggregate_type = "ClubSubscription",
    occurred_at = expired_at,
    event_id = event_id
);

impl SubscriptionSubmitted {
    pub fn from_subscription(sub: &ClubSubscription) -> Self {
        Self {
            event_id: EventId::new(),
            subscription_id: sub.id,
            club_id: sub.club_id,
            submitted_by: sub.submitted_by.clone(),
            amount: sub.amount,
            original_amount: sub.original_amount,
            coupon_code: sub.coupon_code.clone(),
            submitted_at: sub.created_at,
        }
    }
}

impl SubscriptionExpired {
    pub fn new(subscription_id: SubscriptionId, club_id: ClubId, expired_at: Timestamp) -> Self {
        Self {
            event_id: EventId::new(),
            subscription_id,
            club_id,
            expired_at,
        }
    }
}
