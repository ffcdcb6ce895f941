//! In-memory implementation of SubscriptionRepository.
//!
//! Mirrors the PostgreSQL adapter's guarantees: one open subscription per
//! club, and an expiry sweep that reports each row at most once.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::club::ClubTier;
use crate::domain::foundation::{
    ClubId, DomainError, ErrorCode, SubscriptionId, Timestamp,
};
use crate::domain::subscription::{ClubSubscription, SubscriptionStatus};
use crate::ports::{ClubRepository, ExpiredSubscription, SubscriptionRepository};

pub struct InMemorySubscriptionRepository {
    rows: Mutex<HashMap<SubscriptionId, ClubSubscription>>,
    clubs: Option<Arc<dyn ClubRepository>>,
}

impl InMemorySubscriptionRepository {
    /// Repository that does not touch club tiers on expiry.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            clubs: None,
        }
    }

    /// Repository whose sweep demotes expired clubs through `clubs`.
    pub fn with_club_repository(clubs: Arc<dyn ClubRepository>) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            clubs: Some(clubs),
        }
    }

    pub async fn row_count(&self) -> usize {
        self.rows.lock().await.len()
    }
}

impl Default for InMemorySubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn save(&self, subscription: &ClubSubscription) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().await;
        if subscription.status.is_open() {
            if let Some(existing) = rows
                .values()
                .find(|s| s.club_id == subscription.club_id && s.status.is_open())
            {
                return Err(DomainError::new(
                    ErrorCode::SubscriptionAlreadyOpen,
                    "Club already has an open subscription",
                )
                .with_detail("existing", existing.id.to_string()));
            }
        }
        rows.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(
        &self,
        subscription: &ClubSubscription,
        expected: SubscriptionStatus,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().await;
        match rows.get_mut(&subscription.id) {
            Some(row) if row.status != expected => {
                Err(subscription.stale_write(expected, row.status))
            }
            Some(row) => {
                *row = subscription.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription not found: {}", subscription.id),
            )),
        }
    }

    async fn find_by_id(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<ClubSubscription>, DomainError> {
        Ok(self.rows.lock().await.get(id).cloned())
    }

    async fn find_open_for_club(
        &self,
        club_id: &ClubId,
    ) -> Result<Option<ClubSubscription>, DomainError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|s| &s.club_id == club_id && s.status.is_open())
            .cloned())
    }

    async fn find_latest_for_club(
        &self,
        club_id: &ClubId,
    ) -> Result<Option<ClubSubscription>, DomainError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|s| &s.club_id == club_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn expire_overdue(
        &self,
        now: Timestamp,
    ) -> Result<Vec<ExpiredSubscription>, DomainError> {
        let (expired, still_paid): (Vec<ExpiredSubscription>, Vec<ClubId>) = {
            let mut rows = self.rows.lock().await;
            let mut expired = Vec::new();
            for row in rows.values_mut() {
                let overdue = row.status == SubscriptionStatus::Active
                    && row.ends_at.map_or(false, |ends| !ends.is_after(&now));
                if overdue {
                    row.expire(now)?;
                    expired.push(ExpiredSubscription {
                        subscription_id: row.id,
                        club_id: row.club_id,
                    });
                }
            }
            let still_paid = rows
                .values()
                .filter(|s| s.is_active(now))
                .map(|s| s.club_id)
                .collect();
            (expired, still_paid)
        };

        if let Some(clubs) = &self.clubs {
            for row in &expired {
                if still_paid.contains(&row.club_id) {
                    continue;
                }
                match clubs.set_tier(&row.club_id, ClubTier::Free).await {
                    Ok(()) => {}
                    Err(e) if e.code == ErrorCode::ClubNotFound => {
                        tracing::warn!(club_id = %row.club_id, "Expired subscription for unknown club");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(expired)
    }
}
