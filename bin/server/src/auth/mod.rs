//! Authentication module for the TeleMedica server.
//!
//! This module provides:
//! - An HTTP client for the hosted identity provider
//! - Form-post routes for sign-in, sign-up, and sign-out
//! - Duplicate-submission suppression for those routes
//!
//! Credentials never touch this server's storage; the hosted identity
//! provider verifies them and issues access tokens. The session cookie
//! carries the provider access token, and every protected request is
//! validated against the provider, so external revocation takes effect on
//! the next request. The role model itself (three tiers derived from
//! provider metadata, patient default) is documented in
//! [`telemedica_identity`].

pub mod client;
pub mod routes;
pub mod submissions;

pub use client::HttpIdentityProvider;
pub use routes::{sign_in, sign_out, sign_up};
pub use submissions::InFlightSubmissions;

use crate::config::SessionConfig;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    /// Identity provider client.
    pub provider: Arc<HttpIdentityProvider>,
    /// Session cookie configuration.
    pub session_config: SessionConfig,
    /// In-flight auth operations, for duplicate-submission suppression.
    pub submissions: InFlightSubmissions,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(provider: Arc<HttpIdentityProvider>, session_config: SessionConfig) -> Self {
        Self {
            provider,
            session_config,
            submissions: InFlightSubmissions::default(),
        }
    }
}
