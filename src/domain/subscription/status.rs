//! Club subscription status state machine.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Stored lifecycle status of a paid club subscription.
///
/// ```text
/// PendingVerification ──approve──▶ Active ──sweep──▶ Expired
///          │                          │
///          └──reject──▶ Rejected      └──cancel──▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Payment submitted, waiting for an admin to verify it.
    PendingVerification,

    /// Verified and within (or, before the sweep runs, past) its paid period.
    Active,

    /// Paid period ended. Set by the expiry sweep.
    Expired,

    /// Admin refused the payment.
    Rejected,

    /// Ended early by an explicit action.
    Cancelled,
}

impl SubscriptionStatus {
    /// Returns the persisted string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::PendingVerification => "pending_verification",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Rejected => "rejected",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and active subscriptions block a new submission for the same club.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::PendingVerification | SubscriptionStatus::Active
        )
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_verification" => Ok(SubscriptionStatus::PendingVerification),
            "active" => Ok(SubscriptionStatus::Active),
            "expired" => Ok(SubscriptionStatus::Expired),
            "rejected" => Ok(SubscriptionStatus::Rejected),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "subscription_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn successors(&self) -> &'static [Self] {
        use SubscriptionStatus::*;
        match self {
            PendingVerification => &[Active, Rejected],
            Active => &[Expired, Cancelled],
            Expired | Rejected | Cancelled => &[],
        }
    }
}
