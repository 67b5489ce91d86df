//! Domain error types for server operations.
//!
//! Server functions log the detailed variant and hand the browser a
//! user-safe message via [`SessionError::into_server_error`].

use leptos::server_fn::error::ServerFnError;
use std::fmt;

/// Session-related errors.
#[derive(Debug)]
pub enum SessionError {
    /// User is not authenticated (no session cookie).
    NotAuthenticated,
    /// The session token is no longer accepted by the identity provider.
    Expired,
    /// The signed-in user's role does not permit this operation.
    AccessDenied { required: &'static str },
    /// The identity provider could not be reached to validate the session.
    ProviderUnreachable { details: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::Expired => write!(f, "session has expired"),
            Self::AccessDenied { required } => {
                write!(f, "'{}' access required", required)
            }
            Self::ProviderUnreachable { details } => {
                write!(f, "identity provider unreachable: {}", details)
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl SessionError {
    /// Convert to a user-safe ServerFnError.
    pub fn into_server_error(self) -> ServerFnError {
        match &self {
            SessionError::NotAuthenticated => ServerFnError::new("Not authenticated"),
            SessionError::Expired => ServerFnError::new("Session expired"),
            SessionError::AccessDenied { .. } => ServerFnError::new("Access denied"),
            SessionError::ProviderUnreachable { .. } => {
                ServerFnError::new("Identity provider unreachable")
            }
        }
    }
}
