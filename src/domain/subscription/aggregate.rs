//! Club subscription aggregate.
//!
//! A club pays for the pro tier by submitting a payment reference, which an
//! admin verifies by hand. The aggregate keeps the stored status verbatim;
//! whether the subscription currently grants pro access is the derived
//! [`ClubSubscription::is_active`] read.
//!
//! # Design Decisions
//!
//! - **Money in cents**: `amount` and `original_amount` are `Money`
//! - **Explicit clock**: every transition takes `now` so the sweep and the
//!   request path agree on the same instant
//! - **Stored vs. effective status**: an `Active` row past `ends_at` still
//!   reads `Active` until the sweep runs; `effective_status` reports
//!   `Expired` for it

use crate::domain::foundation::{
    ClubId, CouponId, DomainError, ErrorCode, Money, StateMachine, SubscriptionId, Timestamp,
    UserId,
};
use serde::{Deserialize, Serialize};

use super::SubscriptionStatus;

/// Payment details supplied when a club submits for the pro tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSubmission {
    pub club_id: ClubId,
    pub submitted_by: UserId,
    pub original_amount: Money,
    pub amount: Money,
    pub coupon_id: Option<CouponId>,
    pub coupon_code: Option<String>,
    pub payment_method: String,
    /// Opaque reference to the payment proof (transfer id, receipt number).
    pub payment_reference: String,
}

/// A club's paid subscription.
///
/// # Invariants
///
/// - `amount <= original_amount`, both non-negative
/// - `starts_at < ends_at` once approved
/// - Status transitions follow [`SubscriptionStatus`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSubscription {
    pub id: SubscriptionId,
    pub club_id: ClubId,
    pub submitted_by: UserId,
    pub status: SubscriptionStatus,
    /// Amount actually payable after any coupon.
    pub amount: Money,
    /// List price before any coupon.
    pub original_amount: Money,
    pub coupon_id: Option<CouponId>,
    pub coupon_code: Option<String>,
    pub payment_method: String,
    pub payment_reference: String,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub verified_by: Option<UserId>,
    pub verified_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub admin_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ClubSubscription {
    /// Records a payment submission awaiting verification.
    pub fn submit(submission: PaymentSubmission, now: Timestamp) -> Result<Self, DomainError> {
        if submission.payment_method.trim().is_empty() {
            return Err(DomainError::validation(
                "payment_method",
                "Payment method is required",
            ));
        }
        if submission.payment_reference.trim().is_empty() {
            return Err(DomainError::validation(
                "payment_reference",
                "Payment reference is required",
            ));
        }
        if submission.amount.cents() < 0 || submission.original_amount.cents() < 0 {
            return Err(DomainError::validation("amount", "Amounts cannot be negative"));
        }
        if submission.amount > submission.original_amount {
            return Err(DomainError::validation(
                "amount",
                "Payable amount cannot exceed the original amount",
            ));
        }

        Ok(Self {
            id: SubscriptionId::new(),
            club_id: submission.club_id,
            submitted_by: submission.submitted_by,
            status: SubscriptionStatus::PendingVerification,
            amount: submission.amount,
            original_amount: submission.original_amount,
            coupon_id: submission.coupon_id,
            coupon_code: submission.coupon_code,
            payment_method: submission.payment_method.trim().to_string(),
            payment_reference: submission.payment_reference.trim().to_string(),
            starts_at: None,
            ends_at: None,
            verified_by: None,
            verified_at: None,
            rejected_at: None,
            cancelled_at: None,
            admin_note: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Admin approval: activates the subscription for `[starts_at, ends_at)`.
    pub fn approve(
        &mut self,
        verifier: UserId,
        starts_at: Timestamp,
        ends_at: Timestamp,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if !ends_at.is_after(&starts_at) {
            return Err(DomainError::validation(
                "ends_at",
                "Subscription must end after it starts",
            ));
        }
        self.transition_to(SubscriptionStatus::Active)?;
        self.starts_at = Some(starts_at);
        self.ends_at = Some(ends_at);
        self.verified_by = Some(verifier);
        self.verified_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Admin rejection with an explanatory note.
    pub fn reject(
        &mut self,
        verifier: UserId,
        admin_note: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let note = admin_note.into();
        if note.trim().is_empty() {
            return Err(DomainError::validation(
                "admin_note",
                "A rejection needs a note for the club",
            ));
        }
        self.transition_to(SubscriptionStatus::Rejected)?;
        self.verified_by = Some(verifier);
        self.admin_note = Some(note.trim().to_string());
        self.rejected_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Ends an active subscription early.
    pub fn cancel(&mut self, note: Option<String>, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(SubscriptionStatus::Cancelled)?;
        if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
            self.admin_note = Some(note.trim().to_string());
        }
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Marks an active subscription whose period has ended as expired.
    pub fn expire(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if !self.is_past_end(now) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Subscription period has not ended yet",
            ));
        }
        self.transition_to(SubscriptionStatus::Expired)?;
        self.updated_at = now;
        Ok(())
    }

    /// True iff stored status is `Active` and `ends_at` is set and after `now`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.status == SubscriptionStatus::Active
            && self.ends_at.map_or(false, |ends| ends.is_after(&now))
    }

    /// Status as access decisions see it at `now`.
    pub fn effective_status(&self, now: Timestamp) -> SubscriptionStatus {
        if self.status == SubscriptionStatus::Active && !self.is_active(now) {
            SubscriptionStatus::Expired
        } else {
            self.status
        }
    }

    /// True when this row blocks a new submission for the club at `now`.
    pub fn is_open(&self, now: Timestamp) -> bool {
        self.effective_status(now).is_open()
    }

    /// Whole days left in the paid period, zero once it has ended.
    pub fn days_remaining(&self, now: Timestamp) -> i64 {
        match self.ends_at {
            Some(ends) if self.is_active(now) => now.whole_days_until(&ends),
            _ => 0,
        }
    }

    fn is_past_end(&self, now: Timestamp) -> bool {
        self.ends_at.map_or(false, |ends| !ends.is_after(&now))
    }

    /// Error for a write-back whose stored status moved from `expected`
    /// to `actual` since this copy was read.
    pub fn stale_write(
        &self,
        expected: SubscriptionStatus,
        actual: SubscriptionStatus,
    ) -> DomainError {
        DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!(
                "Subscription {} is now {}, not {}",
                self.id, actual, expected
            ),
        )
        .with_detail("subscription_id", self.id.to_string())
        .with_detail("expected_status", expected.as_str())
        .with_detail("actual_status", actual.as_str())
    }

    fn transition_to(&mut self, target: SubscriptionStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition subscription from {} to {}",
                    self.status, target
                ),
            )
            .with_detail("subscription_id", self.id.to_string())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> UserId {
        UserId::new("admin-1").unwrap()
    }

    fn submission() -> PaymentSubmission {
        PaymentSubmission {
            club_id: ClubId::new(),
            submitted_by: UserId::new("president-1").unwrap(),
            original_amount: Money::from_major(1000),
            amount: Money::from_major(900),
            coupon_id: None,
            coupon_code: Some("RIDE10".to_string()),
            payment_method: "bank_transfer".to_string(),
            payment_reference: "TX-77812".to_string(),
        }
    }

    fn pending(now: Timestamp) -> ClubSubscription {
        ClubSubscription::submit(submission(), now).unwrap()
    }

    fn active(now: Timestamp) -> ClubSubscription {
        let mut sub = pending(now);
        sub.approve(admin(), now, now.add_days(30), now).unwrap();
        sub
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Submission
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn submit_starts_pending_verification() {
        let now = Timestamp::now();
        let sub = pending(now);
        assert_eq!(sub.status, SubscriptionStatus::PendingVerification);
        assert_eq!(sub.amount, Money::from_major(900));
        assert!(sub.starts_at.is_none());
        assert!(!sub.is_active(now));
    }

    #[test]
    fn submit_requires_payment_reference() {
        let mut s = submission();
        s.payment_reference = "  ".to_string();
        let err = ClubSubscription::submit(s, Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn submit_rejects_amount_above_original() {
        let mut s = submission();
        s.amount = Money::from_major(1100);
        assert!(ClubSubscription::submit(s, Timestamp::now()).is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Approval and rejection
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn approve_sets_period_and_verifier() {
        let now = Timestamp::now();
        let sub = active(now);
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.starts_at, Some(now));
        assert_eq!(sub.ends_at, Some(now.add_days(30)));
        assert_eq!(sub.verified_by, Some(admin()));
        assert_eq!(sub.verified_at, Some(now));
        assert!(sub.is_active(now));
    }

    #[test]
    fn approve_requires_end_after_start() {
        let now = Timestamp::now();
        let mut sub = pending(now);
        let err = sub.approve(admin(), now, now, now).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(sub.status, SubscriptionStatus::PendingVerification);
    }

    #[test]
    fn approve_twice_is_invalid_transition() {
        let now = Timestamp::now();
        let mut sub = active(now);
        let err = sub.approve(admin(), now, now.add_days(30), now).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn reject_records_note() {
        let now = Timestamp::now();
        let mut sub = pending(now);
        sub.reject(admin(), "Transfer not received", now).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Rejected);
        assert_eq!(sub.admin_note.as_deref(), Some("Transfer not received"));
        assert_eq!(sub.rejected_at, Some(now));
    }

    #[test]
    fn reject_requires_note() {
        let now = Timestamp::now();
        let mut sub = pending(now);
        assert!(sub.reject(admin(), "", now).is_err());
    }

    #[test]
    fn active_subscription_cannot_be_rejected() {
        let now = Timestamp::now();
        let mut sub = active(now);
        let err = sub.reject(admin(), "late", now).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Cancellation and expiry
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn cancel_active_subscription() {
        let now = Timestamp::now();
        let mut sub = active(now);
        sub.cancel(Some("Club disbanded".to_string()), now).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert_eq!(sub.cancelled_at, Some(now));
        assert!(!sub.is_active(now));
    }

    #[test]
    fn pending_subscription_cannot_be_cancelled() {
        let now = Timestamp::now();
        let mut sub = pending(now);
        assert!(sub.cancel(None, now).is_err());
    }

    #[test]
    fn active_past_end_is_not_active_but_stored_status_is() {
        let now = Timestamp::now();
        let mut sub = pending(now.minus_days(40));
        sub.approve(admin(), now.minus_days(40), now.minus_days(10), now.minus_days(40))
            .unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(!sub.is_active(now));
        assert_eq!(sub.effective_status(now), SubscriptionStatus::Expired);
        assert!(!sub.is_open(now));
        assert_eq!(sub.days_remaining(now), 0);
    }

    #[test]
    fn is_active_false_exactly_at_end() {
        let now = Timestamp::now();
        let sub = active(now);
        let end = sub.ends_at.unwrap();
        assert!(!sub.is_active(end));
    }

    #[test]
    fn expire_only_after_period_end() {
        let now = Timestamp::now();
        let mut sub = active(now);

        assert!(sub.expire(now).is_err());
        assert_eq!(sub.status, SubscriptionStatus::Active);

        sub.expire(now.add_days(30)).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Expired);
    }

    #[test]
    fn days_remaining_counts_whole_days() {
        let now = Timestamp::now();
        let sub = active(now);
        assert_eq!(sub.days_remaining(now), 30);
        assert_eq!(sub.days_remaining(now.add_days(29).add_secs(1)), 0);
    }
}
