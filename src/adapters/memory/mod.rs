//! In-memory adapters.
//!
//! Process-local implementations of the repository ports, used by tests
//! and for running the worker without a database.

mod club_repository;
mod coupon_repository;
mod settings_repository;
mod subscription_repository;

pub use club_repository::InMemoryClubRepository;
pub use coupon_repository::InMemoryCouponRepository;
pub use settings_repository::InMemorySettingsRepository;
pub use subscription_repository::InMemorySubscriptionRepository;
