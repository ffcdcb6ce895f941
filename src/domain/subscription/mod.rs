//! Subscription module - the paid club subscription lifecycle and coupons.
//!
//! # Lifecycle
//!
//! Submitted as `PendingVerification`, then approved to `Active` or
//! `Rejected` by an admin. An `Active` subscription ends as `Cancelled`
//! (explicit) or `Expired` (the sweep).

mod aggregate;
mod coupon;
mod errors;
mod events;
mod status;

pub use aggregate::{ClubSubscription, PaymentSubmission};
pub use coupon::{
    ClubSubscriptionCoupon, CouponCode, Discount, DiscountQuote, DiscountType,
};
pub use errors::SubscriptionError;
pub use events::{
    SubscriptionApproved, SubscriptionCancelled, SubscriptionExpired, SubscriptionRejected,
    SubscriptionSubmitted,
};
pub use status::SubscriptionStatus;
