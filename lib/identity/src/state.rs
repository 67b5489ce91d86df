//! The controller's published authentication state.

use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::session::Session;

/// A point-in-time view of "who is signed in and with what role".
///
/// Invariant: `role` is present if and only if `session` is present.
/// `loading` is true between controller initialization and the first
/// resolution of a session (and again for the duration of a sign-out call).
/// Snapshots are produced only by the session controller; everything else
/// reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    loading: bool,
    session: Option<Session>,
    role: Option<Role>,
}

impl AuthSnapshot {
    /// The initial state: resolution has not completed yet.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            loading: true,
            session: None,
            role: None,
        }
    }

    /// No user is signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            loading: false,
            session: None,
            role: None,
        }
    }

    /// A user is signed in with the given session and derived role.
    #[must_use]
    pub fn authenticated(session: Session, role: Role) -> Self {
        Self {
            loading: false,
            session: Some(session),
            role: Some(role),
        }
    }

    /// Returns a copy of this snapshot with the loading flag raised.
    #[must_use]
    pub fn with_loading(mut self) -> Self {
        self.loading = true;
        self
    }

    /// True while the first session resolution (or a sign-out) is pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the current session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns the derived role, if a user is signed in.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// True if a user is currently signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self::loading()
    }
}
