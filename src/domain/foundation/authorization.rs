//! Authorization decisions.
//!
//! Policies answer with a plain `bool`. Handlers that log or refuse a
//! request wrap the answer in an [`AuthorizationResult`] so a denial
//! says which action on which resource was refused, for whom, and why.

use super::{DomainError, ErrorCode, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    /// Action name, e.g. `manage_roles`.
    pub action: &'static str,
    pub resource_type: &'static str,
    pub resource_id: String,
    pub user_id: UserId,
    /// `None` when the action is allowed.
    pub denial_reason: Option<&'static str>,
}

impl AuthorizationResult {
    /// An allowed decision; call [`deny`](Self::deny) to refuse it.
    pub fn allow(
        action: &'static str,
        resource_type: &'static str,
        resource_id: impl ToString,
        user_id: &UserId,
    ) -> Self {
        Self {
            action,
            resource_type,
            resource_id: resource_id.to_string(),
            user_id: user_id.clone(),
            denial_reason: None,
        }
    }

    pub fn deny(mut self, reason: &'static str) -> Self {
        self.denial_reason = Some(reason);
        self
    }

    pub fn is_granted(&self) -> bool {
        self.denial_reason.is_none()
    }

    /// `Ok(())` when granted, otherwise `Forbidden` with the action and
    /// resource as details.
    pub fn into_result(self) -> Result<(), DomainError> {
        match self.denial_reason {
            None => Ok(()),
            Some(reason) => Err(DomainError::new(ErrorCode::Forbidden, reason)
                .with_detail("action", self.action)
                .with_detail("resource", format!("{}:{}", self.resource_type, self.resource_id))
                .with_detail("user_id", self.user_id.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rider() -> UserId {
        UserId::new("rider-1").unwrap()
    }

    #[test]
    fn allowed_decision_is_ok() {
        let result = AuthorizationResult::allow("view", "Club", "club-1", &rider());
        assert!(result.is_granted());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn denied_decision_becomes_forbidden() {
        let err = AuthorizationResult::allow("delete", "Club", "club-1", &rider())
            .deny("Only the club owner can delete the club")
            .into_result()
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(err.message, "Only the club owner can delete the club");
        assert_eq!(err.details["action"], "delete");
        assert_eq!(err.details["resource"], "Club:club-1");
        assert_eq!(err.details["user_id"], "rider-1");
    }
}
