//! In-memory implementation of CouponRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::foundation::{CouponId, DomainError};
use crate::domain::subscription::{ClubSubscriptionCoupon, CouponCode};
use crate::ports::CouponRepository;

#[derive(Default)]
pub struct InMemoryCouponRepository {
    coupons: Mutex<HashMap<CouponId, ClubSubscriptionCoupon>>,
}

impl InMemoryCouponRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_id(&self, id: &CouponId) -> Option<ClubSubscriptionCoupon> {
        self.coupons.lock().await.get(id).cloned()
    }
}

#[async_trait]
impl CouponRepository for InMemoryCouponRepository {
    async fn save(&self, coupon: &ClubSubscriptionCoupon) -> Result<(), DomainError> {
        let mut coupons = self.coupons.lock().await;
        if coupons.values().any(|c| c.code == coupon.code) {
            return Err(DomainError::validation("code", "Coupon code already exists"));
        }
        coupons.insert(coupon.id, coupon.clone());
        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &CouponCode,
    ) -> Result<Option<ClubSubscriptionCoupon>, DomainError> {
        Ok(self
            .coupons
            .lock()
            .await
            .values()
            .find(|c| &c.code == code)
            .cloned())
    }

    async fn redeem(&self, id: &CouponId) -> Result<bool, DomainError> {
        let mut coupons = self.coupons.lock().await;
        match coupons.get_mut(id) {
            Some(coupon) if !coupon.is_exhausted() => {
                coupon.times_used += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
