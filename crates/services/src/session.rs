use lms_core::model::LearnerId;
use thiserror::Error;

/// Failure of an authorization check.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("this operation requires an administrator session")]
    AdminRequired,
}

/// What a signed-in user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Learner,
    Admin,
}

/// The acting user, passed explicitly into every guarded operation.
///
/// Services carry no ambient user state; whoever calls them says who is
/// acting. How the session came to exist (login, token, test fixture) is
/// the caller's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    learner_id: LearnerId,
    display_name: String,
    role: Role,
}

impl Session {
    /// Session for a regular learner.
    #[must_use]
    pub fn learner(learner_id: LearnerId, display_name: impl Into<String>) -> Self {
        Self {
            learner_id,
            display_name: display_name.into(),
            role: Role::Learner,
        }
    }

    /// Session for an administrator. Admins are learners too; their id works
    /// everywhere a learner id does.
    #[must_use]
    pub fn admin(learner_id: LearnerId, display_name: impl Into<String>) -> Self {
        Self {
            learner_id,
            display_name: display_name.into(),
            role: Role::Admin,
        }
    }

    // Accessors
    #[must_use]
    pub fn learner_id(&self) -> LearnerId {
        self.learner_id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Guard for admin-only operations.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AdminRequired` for a learner session.
    pub fn require_admin(&self) -> Result<(), AccessError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AccessError::AdminRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes_the_guard() {
        let session = Session::admin(LearnerId::new(1), "Dana");
        assert!(session.is_admin());
        assert_eq!(session.require_admin(), Ok(()));
    }

    #[test]
    fn learner_is_stopped_by_the_guard() {
        let session = Session::learner(LearnerId::new(7), "Robin");
        assert!(!session.is_admin());
        assert_eq!(session.require_admin(), Err(AccessError::AdminRequired));
    }
}
