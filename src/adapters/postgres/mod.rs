//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresClubRepository` - Clubs, memberships and block lists
//! - `PostgresSubscriptionRepository` - Subscriptions and the expiry sweep
//! - `PostgresCouponRepository` - Coupons with conditional redemption
//! - `PostgresSettingsRepository` - Key/value settings
//!
//! Schema lives in `migrations/` and is applied with [`MIGRATOR`].

mod club_repository;
mod coupon_repository;
mod settings_repository;
mod subscription_repository;

pub use club_repository::PostgresClubRepository;
pub use coupon_repository::PostgresCouponRepository;
pub use settings_repository::PostgresSettingsRepository;
pub use subscription_repository::PostgresSubscriptionRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
