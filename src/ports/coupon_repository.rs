//! Coupon repository port.

use crate::domain::foundation::{CouponId, DomainError};
use crate::domain::subscription::{ClubSubscriptionCoupon, CouponCode};
use async_trait::async_trait;

/// Repository port for subscription coupons.
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Save a new coupon.
    async fn save(&self, coupon: &ClubSubscriptionCoupon) -> Result<(), DomainError>;

    /// Find a coupon by its normalized code.
    async fn find_by_code(
        &self,
        code: &CouponCode,
    ) -> Result<Option<ClubSubscriptionCoupon>, DomainError>;

    /// Records one redemption.
    ///
    /// Increments `times_used` only while it is below `max_uses`, as a
    /// single conditional write. Returns `false` when the cap was already
    /// reached, so concurrent redemptions can never overshoot it.
    async fn redeem(&self, id: &CouponId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CouponRepository) {}
    }
}
