//! Provider-issued sessions.
//!
//! A session is the opaque proof of authentication returned by the identity
//! provider. Beyond "present or absent" and its expiry, the portal does not
//! interpret the token contents.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserIdentity;

/// An authenticated session issued by the identity provider.
///
/// Refers to exactly one [`UserIdentity`] for its lifetime. Created on
/// successful sign-in or app-start restoration, destroyed on sign-out or
/// expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque access token presented back to the provider.
    access_token: String,
    /// Opaque refresh token, when the provider issued one.
    refresh_token: Option<String>,
    /// When the access token expires.
    expires_at: DateTime<Utc>,
    /// The authenticated user.
    user: UserIdentity,
}

impl Session {
    /// Creates a session expiring after the given duration.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        valid_for: Duration,
        user: UserIdentity,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + valid_for,
            user,
        }
    }

    /// Creates a session with an explicit expiry instant.
    #[must_use]
    pub fn with_expiry(
        access_token: String,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
        user: UserIdentity,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at,
            user,
        }
    }

    /// Returns the opaque access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the refresh token, if the provider issued one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the authenticated user.
    #[must_use]
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
