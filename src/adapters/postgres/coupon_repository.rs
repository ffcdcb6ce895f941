//! PostgreSQL implementation of CouponRepository.
//!
//! `discount_value` is `NUMERIC(10,2)`; it crosses the wire as a `BIGINT`
//! count of hundredths so no decimal type is needed on the Rust side.

use crate::domain::foundation::{CouponId, DomainError, ErrorCode, Money, Timestamp};
use crate::domain::subscription::{ClubSubscriptionCoupon, CouponCode, Discount, DiscountType};
use crate::ports::CouponRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the CouponRepository port.
pub struct PostgresCouponRepository {
    pool: PgPool,
}

impl PostgresCouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: Uuid,
    code: String,
    discount_type: String,
    discount_value_hundredths: i64,
    max_uses: Option<i32>,
    times_used: i32,
    min_amount_cents: Option<i64>,
    starts_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl TryFrom<CouponRow> for ClubSubscriptionCoupon {
    type Error = DomainError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let code = CouponCode::try_new(&row.code).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid coupon code: {}", e))
        })?;
        let discount_type = parse_discount_type(&row.discount_type)?;
        let discount = Discount::from_parts(discount_type, row.discount_value_hundredths)
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid discount value: {}", e),
                )
            })?;

        Ok(ClubSubscriptionCoupon {
            id: CouponId::from_uuid(row.id),
            code,
            discount,
            max_uses: row.max_uses.map(to_count).transpose()?,
            times_used: to_count(row.times_used)?,
            min_amount: row.min_amount_cents.map(Money::from_cents),
            starts_at: row.starts_at.map(Timestamp::from_datetime),
            expires_at: row.expires_at.map(Timestamp::from_datetime),
            is_active: row.is_active,
        })
    }
}

fn parse_discount_type(s: &str) -> Result<DiscountType, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid discount type value: {}", s),
        )
    })
}

fn to_count(value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative coupon usage count: {}", value),
        )
    })
}

fn from_count(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        DomainError::validation("max_uses", format!("Usage count too large: {}", value))
    })
}

#[async_trait]
impl CouponRepository for PostgresCouponRepository {
    async fn save(&self, coupon: &ClubSubscriptionCoupon) -> Result<(), DomainError> {
        let (discount_type, hundredths) = coupon.discount.to_parts();

        sqlx::query(
            r#"
            INSERT INTO club_subscription_coupons (
                id, code, discount_type, discount_value, max_uses, times_used,
                min_amount_cents, starts_at, expires_at, is_active
            ) VALUES ($1, $2, $3, ROUND($4::BIGINT / 100.0, 2), $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(coupon.id.as_uuid())
        .bind(coupon.code.as_str())
        .bind(discount_type.as_str())
        .bind(hundredths)
        .bind(coupon.max_uses.map(from_count).transpose()?)
        .bind(from_count(coupon.times_used)?)
        .bind(coupon.min_amount.map(|m| m.cents()))
        .bind(coupon.starts_at.map(|t| *t.as_datetime()))
        .bind(coupon.expires_at.map(|t| *t.as_datetime()))
        .bind(coupon.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("club_subscription_coupons_code_key") {
                    return DomainError::validation("code", "Coupon code already exists");
                }
            }
            DomainError::database("Failed to save coupon", e)
        })?;

        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &CouponCode,
    ) -> Result<Option<ClubSubscriptionCoupon>, DomainError> {
        let row: Option<CouponRow> = sqlx::query_as(
            r#"
            SELECT id, code, discount_type,
                   (discount_value * 100)::BIGINT AS discount_value_hundredths,
                   max_uses, times_used, min_amount_cents, starts_at, expires_at, is_active
            FROM club_subscription_coupons
            WHERE code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find coupon", e))?;

        row.map(ClubSubscriptionCoupon::try_from).transpose()
    }

    async fn redeem(&self, id: &CouponId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE club_subscription_coupons
            SET times_used = times_used + 1
            WHERE id = $1
              AND (max_uses IS NULL OR times_used < max_uses)
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to redeem coupon", e))?;

        Ok(result.rows_affected() == 1)
    }
}
