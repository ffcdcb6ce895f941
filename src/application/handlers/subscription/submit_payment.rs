//! SubmitPaymentHandler - Command handler for club pro tier payments.
//!
//! Club leadership submits a payment reference for the current pro price,
//! optionally with a coupon. The subscription waits for an admin to verify
//! the payment.

use std::sync::Arc;
use tracing::{debug, info};

use crate::application::SettingsStore;
use crate::domain::club::{ClubAction, ClubPolicy, ClubTier};
use crate::domain::foundation::{
    ClubId, ErrorCode, SerializableDomainEvent, Timestamp, UserId,
};
use crate::domain::subscription::{
    ClubSubscription, ClubSubscriptionCoupon, CouponCode, DiscountQuote, PaymentSubmission,
    SubscriptionError, SubscriptionExpired, SubscriptionSubmitted,
};
use crate::ports::{ClubRepository, CouponRepository, EventPublisher, SubscriptionRepository};

/// Command to submit a pro tier payment for a club.
#[derive(Debug, Clone)]
pub struct SubmitPaymentCommand {
    pub club_id: ClubId,
    pub user_id: UserId,
    pub coupon_code: Option<String>,
    pub payment_method: String,
    pub payment_reference: String,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitPaymentResult {
    pub subscription: ClubSubscription,
    pub quote: DiscountQuote,
    pub event: SubscriptionSubmitted,
}

pub struct SubmitPaymentHandler {
    clubs: Arc<dyn ClubRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    coupons: Arc<dyn CouponRepository>,
    settings: Arc<SettingsStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SubmitPaymentHandler {
    pub fn new(
        clubs: Arc<dyn ClubRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        coupons: Arc<dyn CouponRepository>,
        settings: Arc<SettingsStore>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            clubs,
            subscriptions,
            coupons,
            settings,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitPaymentCommand,
    ) -> Result<SubmitPaymentResult, SubscriptionError> {
        let now = Timestamp::now();

        // 1. Only club leadership pays for the club
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

        // 2. One open subscription per club; a lapsed one is closed out first
        self.close_lapsed_subscription(&club.id, now).await?;

        // 3. Price and coupon
        let price = self.settings.club_pro_price().await?;
        let coupon = match &cmd.coupon_code {
            Some(code) => Some(self.usable_coupon(code, now).await?),
            None => None,
        };
        let quote = coupon
            .as_ref()
            .map_or_else(|| DiscountQuote::undiscounted(price), |c| c.quote(price));

        let subscription = ClubSubscription::submit(
            PaymentSubmission {
                club_id: club.id,
                submitted_by: cmd.user_id.clone(),
                original_amount: quote.original,
                amount: quote.payable,
                coupon_id: coupon.as_ref().map(|c| c.id),
                coupon_code: coupon.as_ref().map(|c| c.code.as_str().to_string()),
                payment_method: cmd.payment_method,
                payment_reference: cmd.payment_reference,
            },
            now,
        )?;

        // 4. Redeem the coupon; the conditional increment decides races
        if let Some(coupon) = &coupon {
            if !self.coupons.redeem(&coupon.id).await? {
                return Err(SubscriptionError::coupon_exhausted(coupon.code.as_str()));
            }
        }

        // 5. Persist
        if let Err(e) = self.subscriptions.save(&subscription).await {
            if e.code == ErrorCode::SubscriptionAlreadyOpen {
                return Err(self.already_open(club.id).await);
            }
            return Err(e.into());
        }

        // 6. Publish
        let event = SubscriptionSubmitted::from_subscription(&subscription);
        let envelope = event.to_envelope()?.with_user_id(cmd.user_id.as_str());
        self.event_publisher.publish(envelope).await?;

        info!(
            subscription_id = %subscription.id,
            club_id = %subscription.club_id,
            amount = %subscription.amount,
            coupon = ?subscription.coupon_code,
            "Club subscription submitted"
        );

        Ok(SubmitPaymentResult {
            subscription,
            quote,
            event,
        })
    }

    /// Refuses while an open subscription exists, except for an active one
    /// whose period already ended: that one is expired here instead of
    /// waiting for the next sweep.
    async fn close_lapsed_subscription(
        &self,
        club_id: &ClubId,
        now: Timestamp,
    ) -> Result<(), SubscriptionError> {
        let Some(mut existing) = self.subscriptions.find_open_for_club(club_id).await? else {
            return Ok(());
        };
        if existing.is_open(now) {
            return Err(SubscriptionError::already_open(*club_id, existing.id));
        }

        let read_as = existing.status;
        existing.expire(now)?;
        match self.subscriptions.update(&existing, read_as).await {
            Ok(()) => {}
            // The sweep or a cancel closed it first and did the demotion.
            Err(e) if e.code == ErrorCode::InvalidStateTransition => return Ok(()),
            Err(e) => return Err(e.into()),
        }
        self.clubs.set_tier(club_id, ClubTier::Free).await?;

        let event = SubscriptionExpired::new(existing.id, existing.club_id, now);
        self.event_publisher.publish(event.to_envelope()?).await?;
        debug!(subscription_id = %existing.id, "Expired lapsed subscription before resubmission");
        Ok(())
    }

    async fn usable_coupon(
        &self,
        raw_code: &str,
        now: Timestamp,
    ) -> Result<ClubSubscriptionCoupon, SubscriptionError> {
        let code = CouponCode::try_new(raw_code)
            .map_err(|e| SubscriptionError::invalid_coupon(raw_code, e.to_string()))?;
        let coupon = self
            .coupons
            .find_by_code(&code)
            .await?
            .ok_or_else(|| SubscriptionError::coupon_not_found(code.as_str()))?;

        if coupon.is_valid(now) {
            return Ok(coupon);
        }
        if coupon.is_exhausted() {
            return Err(SubscriptionError::coupon_exhausted(code.as_str()));
        }
        let reason = if !coupon.is_active {
            "coupon is disabled"
        } else if coupon.starts_at.map_or(false, |s| s.is_after(&now)) {
            "coupon is not valid yet"
        } else {
            "coupon has expired"
        };
        Err(SubscriptionError::invalid_coupon(code.as_str(), reason))
    }

    async fn already_open(&self, club_id: ClubId) -> SubscriptionError {
        match self.subscriptions.find_open_for_club(&club_id).await {
            Ok(Some(existing)) => SubscriptionError::already_open(club_id, existing.id),
            Ok(None) => SubscriptionError::InvalidState {
                message: "Club subscription changed concurrently; retry".to_string(),
            },
            Err(e) => e.into(),
        }
    }
}
