//! Error types for authentication and session operations.
//!
//! Every failure talking to the identity provider collapses into
//! [`AuthError`]. None of these are fatal: the worst case for the caller is
//! surfacing a message and asking the user to re-authenticate.

use std::fmt;

/// Errors from sign-in, sign-up, and sign-out operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The identity provider rejected the supplied credentials.
    InvalidCredentials,
    /// The identity provider could not be reached (network failure or
    /// timeout).
    ProviderUnreachable { reason: String },
    /// A second sign-in/sign-up/sign-out was attempted while one was
    /// already outstanding. Suppressed by callers (the submitting control
    /// is disabled); never shown to the user as a failure.
    DuplicateSubmission,
    /// The session was revoked or expired, as reported by the provider.
    SessionExpired,
    /// Any other failure reported by the provider (for example an email
    /// address that is already registered).
    Provider { reason: String },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => {
                write!(f, "invalid email or password")
            }
            Self::ProviderUnreachable { reason } => {
                write!(f, "identity provider unreachable: {reason}")
            }
            Self::DuplicateSubmission => {
                write!(f, "a submission is already in progress")
            }
            Self::SessionExpired => {
                write!(f, "session has expired")
            }
            Self::Provider { reason } => {
                write!(f, "identity provider error: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_display() {
        let err = AuthError::InvalidCredentials;
        assert!(err.to_string().contains("invalid email or password"));
    }

    #[test]
    fn provider_unreachable_display_includes_reason() {
        let err = AuthError::ProviderUnreachable {
            reason: "connection timed out".to_string(),
        };
        assert!(err.to_string().contains("unreachable"));
        assert!(err.to_string().contains("connection timed out"));
    }

    #[test]
    fn duplicate_submission_display() {
        let err = AuthError::DuplicateSubmission;
        assert!(err.to_string().contains("already in progress"));
    }

    #[test]
    fn session_expired_display() {
        let err = AuthError::SessionExpired;
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn provider_display_includes_reason() {
        let err = AuthError::Provider {
            reason: "email already registered".to_string(),
        };
        assert!(err.to_string().contains("email already registered"));
    }
}
