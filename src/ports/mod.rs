//! Ports - async interfaces between the application and infrastructure.
//!
//! Every port is `Send + Sync` so handlers can hold them as `Arc<dyn Port>`.

mod club_repository;
mod coupon_repository;
mod event_publisher;
mod settings_repository;
mod subscription_repository;

pub use club_repository::{ClubRepository, RoleCounts};
pub use coupon_repository::CouponRepository;
pub use event_publisher::EventPublisher;
pub use settings_repository::SettingsRepository;
pub use subscription_repository::{ExpiredSubscription, SubscriptionRepository};
