//! Subscription-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound, NoneForClub, ClubNotFound, CouponNotFound | 404 |
//! | AlreadyOpen | 409 |
//! | InvalidState | 409 |
//! | InvalidCoupon, CouponExhausted | 400 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{ClubId, DomainError, ErrorCode, SubscriptionId};

/// Subscription-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Subscription was not found.
    NotFound(SubscriptionId),

    /// The club has never submitted a subscription.
    NoneForClub(ClubId),

    /// The club the subscription is for does not exist.
    ClubNotFound(ClubId),

    /// The club already has a pending or active subscription.
    AlreadyOpen {
        club_id: ClubId,
        existing: SubscriptionId,
    },

    /// Invalid state for the requested operation.
    InvalidState { message: String },

    /// Coupon code does not exist.
    CouponNotFound(String),

    /// Coupon exists but cannot be used right now.
    InvalidCoupon { code: String, reason: String },

    /// Coupon hit its usage cap, possibly in a concurrent redemption.
    CouponExhausted(String),

    /// Acting user may not perform this operation.
    Forbidden(String),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn not_found(id: SubscriptionId) -> Self {
        SubscriptionError::NotFound(id)
    }

    pub fn none_for_club(club_id: ClubId) -> Self {
        SubscriptionError::NoneForClub(club_id)
    }

    pub fn club_not_found(club_id: ClubId) -> Self {
        SubscriptionError::ClubNotFound(club_id)
    }

    pub fn already_open(club_id: ClubId, existing: SubscriptionId) -> Self {
        SubscriptionError::AlreadyOpen { club_id, existing }
    }

    pub fn coupon_not_found(code: impl Into<String>) -> Self {
        SubscriptionError::CouponNotFound(code.into())
    }

    pub fn invalid_coupon(code: impl Into<String>, reason: impl Into<String>) -> Self {
        SubscriptionError::InvalidCoupon {
            code: code.into(),
            reason: reason.into(),
        }
    }

    pub fn coupon_exhausted(code: impl Into<String>) -> Self {
        SubscriptionError::CouponExhausted(code.into())
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        SubscriptionError::Forbidden(reason.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::NotFound(_) | SubscriptionError::NoneForClub(_) => {
                ErrorCode::SubscriptionNotFound
            }
            SubscriptionError::ClubNotFound(_) => ErrorCode::ClubNotFound,
            SubscriptionError::AlreadyOpen { .. } => ErrorCode::SubscriptionAlreadyOpen,
            SubscriptionError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            SubscriptionError::CouponNotFound(_) => ErrorCode::CouponNotFound,
            SubscriptionError::InvalidCoupon { .. } => ErrorCode::InvalidCoupon,
            SubscriptionError::CouponExhausted(_) => ErrorCode::CouponExhausted,
            SubscriptionError::Forbidden(_) => ErrorCode::Forbidden,
            SubscriptionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::NotFound(id) => format!("Subscription not found: {}", id),
            SubscriptionError::NoneForClub(club_id) => {
                format!("Club {} has no subscription", club_id)
            }
            SubscriptionError::ClubNotFound(club_id) => format!("Club not found: {}", club_id),
            SubscriptionError::AlreadyOpen { club_id, existing } => format!(
                "Club {} already has an open subscription ({})",
                club_id, existing
            ),
            SubscriptionError::InvalidState { message } => message.clone(),
            SubscriptionError::CouponNotFound(code) => format!("Coupon '{}' not found", code),
            SubscriptionError::InvalidCoupon { code, reason } => {
                format!("Coupon '{}' is invalid: {}", code, reason)
            }
            SubscriptionError::CouponExhausted(code) => {
                format!("Coupon '{}' has been fully redeemed", code)
            }
            SubscriptionError::Forbidden(reason) => format!("Forbidden: {}", reason),
            SubscriptionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SubscriptionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubscriptionError::Infrastructure(_))
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => SubscriptionError::InvalidState {
                message: err.message,
            },
            ErrorCode::ValidationFailed => SubscriptionError::ValidationFailed {
                field: err.field(),
                message: err.message,
            },
            ErrorCode::Forbidden => SubscriptionError::Forbidden(err.message),
            _ => SubscriptionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<SubscriptionError> for DomainError {
    fn from(err: SubscriptionError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_open_maps_to_conflict_code() {
        let err = SubscriptionError::already_open(ClubId::new(), SubscriptionId::new());
        assert_eq!(err.code(), ErrorCode::SubscriptionAlreadyOpen);
        assert!(!err.is_retryable());
    }

    #[test]
    fn coupon_errors_have_distinct_codes() {
        assert_eq!(
            SubscriptionError::coupon_not_found("X").code(),
            ErrorCode::CouponNotFound
        );
        assert_eq!(
            SubscriptionError::invalid_coupon("X", "expired").code(),
            ErrorCode::InvalidCoupon
        );
        assert_eq!(
            SubscriptionError::coupon_exhausted("X").code(),
            ErrorCode::CouponExhausted
        );
    }

    #[test]
    fn invalid_coupon_message_includes_reason() {
        let err = SubscriptionError::invalid_coupon("SPRING", "coupon has expired");
        assert_eq!(err.to_string(), "Coupon 'SPRING' is invalid: coupon has expired");
    }

    #[test]
    fn state_transition_domain_error_becomes_invalid_state() {
        let domain = DomainError::new(ErrorCode::InvalidStateTransition, "Cannot transition");
        let err: SubscriptionError = domain.into();
        assert_eq!(
            err,
            SubscriptionError::InvalidState {
                message: "Cannot transition".to_string()
            }
        );
    }

    #[test]
    fn validation_domain_error_keeps_field() {
        let domain = DomainError::validation("ends_at", "must be after start");
        let err: SubscriptionError = domain.into();
        assert_eq!(err, SubscriptionError::validation("ends_at", "must be after start"));
    }

    #[test]
    fn database_error_is_retryable_infrastructure() {
        let err: SubscriptionError = DomainError::database("save", "timeout").into();
        assert!(err.is_retryable());
    }
}
