//! PostgreSQL implementation of SubscriptionRepository.
//!
//! The expiry sweep runs inside one transaction guarded by a
//! transaction-scoped advisory lock. The `UPDATE` predicate excludes rows
//! that are already expired, so a run that loses the race or repeats
//! changes nothing.

use crate::domain::club::ClubTier;
use crate::domain::foundation::{
    ClubId, CouponId, DomainError, ErrorCode, Money, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::{ClubSubscription, SubscriptionStatus};
use crate::ports::{ExpiredSubscription, SubscriptionRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Advisory lock key shared by every sweeper process ("mcsubs").
const SWEEP_LOCK_KEY: i64 = 0x6d63_7375_6273;

const OPEN_PER_CLUB_CONSTRAINT: &str = "club_subscriptions_one_open_per_club";

const SELECT_COLUMNS: &str = r#"
    SELECT id, club_id, submitted_by, status, amount_cents, original_amount_cents,
           coupon_id, coupon_code, payment_method, payment_reference, starts_at, ends_at,
           verified_by, verified_at, rejected_at, cancelled_at, admin_note,
           created_at, updated_at
    FROM club_subscriptions
"#;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a club subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    club_id: Uuid,
    submitted_by: String,
    status: String,
    amount_cents: i64,
    original_amount_cents: i64,
    coupon_id: Option<Uuid>,
    coupon_code: Option<String>,
    payment_method: String,
    payment_reference: String,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    verified_by: Option<String>,
    verified_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    admin_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for ClubSubscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(ClubSubscription {
            id: SubscriptionId::from_uuid(row.id),
            club_id: ClubId::from_uuid(row.club_id),
            submitted_by: parse_user_id(row.submitted_by)?,
            status: parse_status(&row.status)?,
            amount: Money::from_cents(row.amount_cents),
            original_amount: Money::from_cents(row.original_amount_cents),
            coupon_id: row.coupon_id.map(CouponId::from_uuid),
            coupon_code: row.coupon_code,
            payment_method: row.payment_method,
            payment_reference: row.payment_reference,
            starts_at: row.starts_at.map(Timestamp::from_datetime),
            ends_at: row.ends_at.map(Timestamp::from_datetime),
            verified_by: row.verified_by.map(parse_user_id).transpose()?,
            verified_at: row.verified_at.map(Timestamp::from_datetime),
            rejected_at: row.rejected_at.map(Timestamp::from_datetime),
            cancelled_at: row.cancelled_at.map(Timestamp::from_datetime),
            admin_note: row.admin_note,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<SubscriptionStatus, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid subscription status value: {}", s),
        )
    })
}

fn parse_user_id(s: String) -> Result<UserId, DomainError> {
    UserId::new(s).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e))
    })
}

fn to_datetime(ts: Option<Timestamp>) -> Option<DateTime<Utc>> {
    ts.map(|t| *t.as_datetime())
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn save(&self, subscription: &ClubSubscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO club_subscriptions (
                id, club_id, submitted_by, status, amount_cents, original_amount_cents,
                coupon_id, coupon_code, payment_method, payment_reference, starts_at, ends_at,
                verified_by, verified_at, rejected_at, cancelled_at, admin_note,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.club_id.as_uuid())
        .bind(subscription.submitted_by.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.amount.cents())
        .bind(subscription.original_amount.cents())
        .bind(subscription.coupon_id.map(|id| *id.as_uuid()))
        .bind(&subscription.coupon_code)
        .bind(&subscription.payment_method)
        .bind(&subscription.payment_reference)
        .bind(to_datetime(subscription.starts_at))
        .bind(to_datetime(subscription.ends_at))
        .bind(subscription.verified_by.as_ref().map(|u| u.as_str()))
        .bind(to_datetime(subscription.verified_at))
        .bind(to_datetime(subscription.rejected_at))
        .bind(to_datetime(subscription.cancelled_at))
        .bind(&subscription.admin_note)
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(OPEN_PER_CLUB_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::SubscriptionAlreadyOpen,
                        "Club already has an open subscription",
                    )
                    .with_detail("club_id", subscription.club_id.to_string());
                }
            }
            DomainError::database("Failed to save subscription", e)
        })?;

        Ok(())
    }

    async fn update(
        &self,
        subscription: &ClubSubscription,
        expected: SubscriptionStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE club_subscriptions SET
                status = $2,
                starts_at = $3,
                ends_at = $4,
                verified_by = $5,
                verified_at = $6,
                rejected_at = $7,
                cancelled_at = $8,
                admin_note = $9,
                updated_at = $10
            WHERE id = $1 AND status = $11
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.status.as_str())
        .bind(to_datetime(subscription.starts_at))
        .bind(to_datetime(subscription.ends_at))
        .bind(subscription.verified_by.as_ref().map(|u| u.as_str()))
        .bind(to_datetime(subscription.verified_at))
        .bind(to_datetime(subscription.rejected_at))
        .bind(to_datetime(subscription.cancelled_at))
        .bind(&subscription.admin_note)
        .bind(subscription.updated_at.as_datetime())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update subscription", e))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing matched: either the row is gone or its status moved on.
        let stored: Option<String> =
            sqlx::query_scalar("SELECT status FROM club_subscriptions WHERE id = $1")
                .bind(subscription.id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to re-read subscription", e))?;

        match stored {
            Some(actual) => Err(subscription.stale_write(expected, parse_status(&actual)?)),
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
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to find subscription", e))?;

        row.map(ClubSubscription::try_from).transpose()
    }

    async fn find_open_for_club(
        &self,
        club_id: &ClubId,
    ) -> Result<Option<ClubSubscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE club_id = $1 AND status IN ('pending_verification', 'active')",
            SELECT_COLUMNS
        ))
        .bind(club_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find open subscription", e))?;

        row.map(ClubSubscription::try_from).transpose()
    }

    async fn find_latest_for_club(
        &self,
        club_id: &ClubId,
    ) -> Result<Option<ClubSubscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE club_id = $1 ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(club_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find latest subscription", e))?;

        row.map(ClubSubscription::try_from).transpose()
    }

    async fn expire_overdue(
        &self,
        now: Timestamp,
    ) -> Result<Vec<ExpiredSubscription>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin sweep transaction", e))?;

        let locked: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
            .bind(SWEEP_LOCK_KEY)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to acquire sweep lock", e))?;

        if !locked {
            tracing::debug!("Expiry sweep already running in another session, skipping");
            return Ok(Vec::new());
        }

        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            UPDATE club_subscriptions
            SET status = 'expired', updated_at = $1
            WHERE status = 'active'
              AND ends_at IS NOT NULL
              AND ends_at <= $1
            RETURNING id, club_id
            "#,
        )
        .bind(now.as_datetime())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to expire subscriptions", e))?;

        if !rows.is_empty() {
            let club_ids: Vec<Uuid> = rows.iter().map(|(_, club_id)| *club_id).collect();
            sqlx::query(
                r#"
                UPDATE clubs SET tier = $3, updated_at = $2
                WHERE id = ANY($1)
                  AND NOT EXISTS (
                      SELECT 1 FROM club_subscriptions s
                      WHERE s.club_id = clubs.id
                        AND s.status = 'active'
                        AND s.ends_at > $2
                  )
                "#,
            )
            .bind(&club_ids)
            .bind(now.as_datetime())
            .bind(ClubTier::Free.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to demote expired clubs", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit sweep transaction", e))?;

        Ok(rows
            .into_iter()
            .map(|(id, club_id)| ExpiredSubscription {
                subscription_id: SubscriptionId::from_uuid(id),
                club_id: ClubId::from_uuid(club_id),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> SubscriptionRow {
        let now = Utc::now();
        SubscriptionRow {
            id: Uuid::new_v4(),
            club_id: Uuid::new_v4(),
            submitted_by: "president-1".to_string(),
            status: status.to_string(),
            amount_cents: 90_000,
            original_amount_cents: 100_000,
            coupon_id: None,
            coupon_code: Some("RIDE10".to_string()),
            payment_method: "bank_transfer".to_string(),
            payment_reference: "TX-1".to_string(),
            starts_at: Some(now),
            ends_at: Some(now + chrono::Duration::days(30)),
            verified_by: Some("admin-1".to_string()),
            verified_at: Some(now),
            rejected_at: None,
            cancelled_at: None,
            admin_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parse_status_accepts_persisted_values() {
        assert_eq!(
            parse_status("pending_verification").unwrap(),
            SubscriptionStatus::PendingVerification
        );
        assert_eq!(parse_status("active").unwrap(), SubscriptionStatus::Active);
        assert_eq!(parse_status("expired").unwrap(), SubscriptionStatus::Expired);
        assert_eq!(parse_status("rejected").unwrap(), SubscriptionStatus::Rejected);
        assert_eq!(parse_status("cancelled").unwrap(), SubscriptionStatus::Cancelled);
    }

    #[test]
    fn parse_status_rejects_unknown_values() {
        let err = parse_status("pending").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn row_converts_to_subscription() {
        let row = row("active");
        let id = row.id;
        let sub = ClubSubscription::try_from(row).unwrap();

        assert_eq!(sub.id.as_uuid(), &id);
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.amount, Money::from_major(900));
        assert_eq!(sub.verified_by, Some(UserId::new("admin-1").unwrap()));
    }

    #[test]
    fn row_with_blank_submitter_is_rejected() {
        let mut row = row("active");
        row.submitted_by = String::new();
        assert!(ClubSubscription::try_from(row).is_err());
    }
}
