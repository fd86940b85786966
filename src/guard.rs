/// Route guards: authentication and role gates
///
/// A guard is purely a function of the session passed in; it caches nothing,
/// so callers re-evaluate it whenever the session changes (e.g. after a
/// logout).
use crate::session::{Role, Session};

/// Outcome of evaluating a guard against the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No session; send the user to the login screen
    RedirectToLogin,
    /// Authenticated, but the session's role does not match the gate
    Denied { required: Role },
    /// Authenticated and authorized; render the wrapped content
    Granted,
}

/// A gate in front of a protected screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGuard {
    required_role: Option<Role>,
}

impl AccessGuard {
    /// Gate that only requires a logged-in session
    pub fn authenticated() -> Self {
        Self {
            required_role: None,
        }
    }

    /// Gate restricted to a specific role
    pub fn role(required: Role) -> Self {
        Self {
            required_role: Some(required),
        }
    }

    pub fn evaluate(&self, session: Option<&Session>) -> Access {
        let Some(session) = session else {
            return Access::RedirectToLogin;
        };
        match self.required_role {
            Some(required) if session.user.role != required => Access::Denied { required },
            _ => Access::Granted,
        }
    }
}
