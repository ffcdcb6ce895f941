//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod club;
pub mod subscription;

#[cfg(test)]
pub(crate) mod test_support;

pub use club::{
    AssignRoleCommand, AssignRoleHandler, AssignRoleResult, AuthorizeClubActionHandler,
    AuthorizeClubActionQuery,
};
pub use subscription::{
    ApproveSubscriptionCommand, ApproveSubscriptionHandler, ApproveSubscriptionResult,
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
    ExpireSubscriptionsCommand, ExpireSubscriptionsHandler, ExpireSubscriptionsResult,
    GetClubSubscriptionHandler, GetClubSubscriptionQuery, GetClubSubscriptionResult,
    RejectSubscriptionCommand, RejectSubscriptionHandler, RejectSubscriptionResult,
    SubmitPaymentCommand, SubmitPaymentHandler, SubmitPaymentResult,
};
