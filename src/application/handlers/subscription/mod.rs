//! Club subscription handlers.
//!
//! ## Commands
//! - Submitting a pro tier payment (club leadership)
//! - Approving or rejecting a submission (admin)
//! - Cancelling an active subscription (club leadership)
//! - Expiring overdue subscriptions (scheduled sweep)
//!
//! ## Queries
//! - Current subscription status for a club

mod approve_subscription;
mod cancel_subscription;
mod expire_subscriptions;
mod get_club_subscription;
mod reject_subscription;
mod submit_payment;

// Commands
pub use approve_subscription::{
    ApproveSubscriptionCommand, ApproveSubscriptionHandler, ApproveSubscriptionResult,
};
pub use cancel_subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
};
pub use expire_subscriptions::{
    ExpireSubscriptionsCommand, ExpireSubscriptionsHandler, ExpireSubscriptionsResult,
};
pub use reject_subscription::{
    RejectSubscriptionCommand, RejectSubscriptionHandler, RejectSubscriptionResult,
};
pub use submit_payment::{SubmitPaymentCommand, SubmitPaymentHandler, SubmitPaymentResult};

// Queries
pub use get_club_subscription::{
    GetClubSubscriptionHandler, GetClubSubscriptionQuery, GetClubSubscriptionResult,
};
