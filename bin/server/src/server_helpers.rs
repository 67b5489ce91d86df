//! Helper functions for server functions with proper error handling and logging.
//!
//! This module provides utilities for common patterns in server functions:
//! resolving the session cookie against the identity provider and enforcing
//! role requirements.

use crate::auth::client::HttpIdentityProvider;
use crate::error::SessionError;
use std::sync::Arc;
use telemedica_identity::{Role, UserIdentity};

/// Name of the cookie carrying the provider access token.
pub const SESSION_COOKIE: &str = "session";

/// The identity behind the current request, validated with the provider.
pub struct CurrentIdentity {
    pub identity: UserIdentity,
    pub role: Role,
}

/// Extracts and validates the current session from the request.
///
/// This function:
/// 1. Gets the session cookie
/// 2. Asks the identity provider who the token belongs to
/// 3. Derives the role from the identity's metadata
///
/// Logs structured errors for debugging while returning user-safe error types.
pub async fn current_identity() -> Result<CurrentIdentity, SessionError> {
    // Get session cookie
    let token = leptos_axum::extract::<axum_extra::extract::CookieJar>()
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Failed to extract cookie jar");
            SessionError::NotAuthenticated
        })?
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(SessionError::NotAuthenticated)?;

    let provider = leptos_axum::extract::<axum::Extension<Arc<HttpIdentityProvider>>>()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Identity provider missing from request extensions");
            SessionError::ProviderUnreachable {
                details: "provider not configured".to_string(),
            }
        })?
        .0;

    // The provider is the system of record; a token it no longer accepts
    // means the session is over, whatever the cookie says.
    let identity = provider
        .user_for_token(&token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Identity provider unreachable during session check");
            SessionError::ProviderUnreachable {
                details: e.to_string(),
            }
        })?
        .ok_or_else(|| {
            tracing::debug!("Session token rejected by identity provider");
            SessionError::Expired
        })?;

    let role = Role::for_identity(&identity);

    Ok(CurrentIdentity { identity, role })
}

/// Extracts the current identity and verifies it holds the required role.
///
/// Returns `SessionError::AccessDenied` on a role mismatch.
pub async fn require_role(required: Role) -> Result<CurrentIdentity, SessionError> {
    let current = current_identity().await?;

    if current.role != required {
        tracing::warn!(
            user_id = %current.identity.id(),
            role = %current.role,
            required = %required,
            "User attempted operation outside their role"
        );
        return Err(SessionError::AccessDenied {
            required: required.as_str(),
        });
    }

    Ok(current)
}
