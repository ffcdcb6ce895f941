//! Club-specific error types.

use crate::domain::foundation::{ClubId, DomainError, ErrorCode, UserId};

use super::ClubRole;

/// Club-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClubError {
    /// Club was not found.
    NotFound(ClubId),

    /// The user holds no membership in the club.
    MemberNotFound { club_id: ClubId, user_id: UserId },

    /// The acting user may not perform the action.
    Forbidden { action: String, reason: String },

    /// The acting user's role cannot hand out this role.
    RoleNotAssignable { assigner: Option<ClubRole>, role: ClubRole },

    /// A tier cap (officers, vice presidents, members) would be exceeded.
    TierLimitReached { limit: &'static str, max: u32 },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl ClubError {
    pub fn not_found(id: ClubId) -> Self {
        ClubError::NotFound(id)
    }

    pub fn member_not_found(club_id: ClubId, user_id: UserId) -> Self {
        ClubError::MemberNotFound { club_id, user_id }
    }

    pub fn forbidden(action: impl Into<String>, reason: impl Into<String>) -> Self {
        ClubError::Forbidden {
            action: action.into(),
            reason: reason.into(),
        }
    }

    pub fn role_not_assignable(assigner: Option<ClubRole>, role: ClubRole) -> Self {
        ClubError::RoleNotAssignable { assigner, role }
    }

    pub fn tier_limit_reached(limit: &'static str, max: u32) -> Self {
        ClubError::TierLimitReached { limit, max }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClubError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ClubError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ClubError::NotFound(_) => ErrorCode::ClubNotFound,
            ClubError::MemberNotFound { .. } => ErrorCode::MemberNotFound,
            ClubError::Forbidden { .. } | ClubError::RoleNotAssignable { .. } => {
                ErrorCode::Forbidden
            }
            ClubError::TierLimitReached { .. } => ErrorCode::TierLimitReached,
            ClubError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ClubError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            ClubError::NotFound(id) => format!("Club not found: {}", id),
            ClubError::MemberNotFound { club_id, user_id } => {
                format!("User {} is not a member of club {}", user_id, club_id)
            }
            ClubError::Forbidden { action, reason } => {
                format!("Not allowed to {}: {}", action, reason)
            }
            ClubError::RoleNotAssignable { assigner, role } => match assigner {
                Some(assigner) => format!(
                    "A {} cannot assign the {} role",
                    assigner.display_name(),
                    role.display_name()
                ),
                None => format!("Cannot assign the {} role", role.display_name()),
            },
            ClubError::TierLimitReached { limit, max } => {
                format!("Club tier allows at most {} {}", max, limit)
            }
            ClubError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ClubError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClubError::Infrastructure(_))
    }
}

impl std::fmt::Display for ClubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ClubError {}

impl From<DomainError> for ClubError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => ClubError::Forbidden {
                action: err
                    .details
                    .get("action")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                reason: err.message,
            },
            ErrorCode::ValidationFailed => ClubError::ValidationFailed {
                field: err.field(),
                message: err.message,
            },
            _ => ClubError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ClubError> for DomainError {
    fn from(err: ClubError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
