//! The identity-provider boundary.
//!
//! The hosted provider is the system of record for credentials and session
//! issuance. This crate consumes it through [`IdentityProvider`]: four
//! request/response operations plus a push-style notification stream fired
//! on sign-in, sign-out, and token refresh.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::AuthError;
use crate::session::Session;

/// Capacity of the session-change broadcast channel.
///
/// Auth events are rare; a small buffer is plenty, and a lagged subscriber
/// simply resynchronizes from the next event.
pub const SESSION_EVENT_CAPACITY: usize = 16;

/// The kind of session change the provider is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChangeKind {
    /// A user signed in.
    SignedIn,
    /// The session ended (explicit sign-out or external revocation).
    SignedOut,
    /// The provider refreshed the session's tokens.
    TokenRefreshed,
}

/// A push notification from the provider's session-change stream.
#[derive(Debug, Clone)]
pub struct SessionChange {
    /// What happened.
    pub kind: SessionChangeKind,
    /// The session after the change; absent for sign-out and revocation.
    pub session: Option<Session>,
}

/// External identity provider: credential verification, account creation,
/// session issuance and invalidation.
///
/// All operations are fallible and asynchronous; callers are expected to
/// render a pending affordance and disable re-submission while one is
/// outstanding. There is no mid-flight cancellation.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies credentials and issues a session.
    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError>;

    /// Creates an account with the given profile metadata.
    ///
    /// Does not establish a session; the provider typically requires a
    /// separate confirmation step before the first sign-in.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), AuthError>;

    /// Invalidates the session identified by the given access token.
    async fn invalidate_session(&self, access_token: &str) -> Result<(), AuthError>;

    /// Fetches the already-existing session, if the device is still
    /// authenticated from a prior visit.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Subscribes to the push-style session-change stream.
    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;
}
