//! HTTP client for the hosted identity provider.
//!
//! Speaks the provider's token-grant REST API: password sign-in, sign-up,
//! token invalidation, and token introspection. Every request carries the
//! project's publishable key; authenticated requests add the user's access
//! token as a bearer credential.

use chrono::Duration;
use reqwest::StatusCode;
use rootcause::prelude::Report;
use serde::Deserialize;
use telemedica_identity::provider::{
    IdentityProvider, SESSION_EVENT_CAPACITY, SessionChange, SessionChangeKind,
};
use telemedica_identity::{AuthError, Session, UserId, UserIdentity};
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::config::ProviderConfig;

/// Client for the hosted identity provider's auth API.
///
/// One instance serves every user of the process, shared behind an `Arc`;
/// it holds a pooled `reqwest` client and the session-change broadcast
/// channel, and deliberately no per-user state.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    publishable_key: String,
    events: broadcast::Sender<SessionChange>,
}

/// A token grant as the provider returns it.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
    user: WireUser,
}

/// A user record as the provider returns it.
#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Map<String, serde_json::Value>,
}

impl WireUser {
    fn into_identity(self) -> UserIdentity {
        UserIdentity::with_metadata(
            UserId::new(self.id),
            self.email.unwrap_or_default(),
            self.user_metadata,
        )
    }
}

impl TokenResponse {
    fn into_session(self) -> Session {
        Session::new(
            self.access_token,
            self.refresh_token,
            Duration::seconds(self.expires_in),
            self.user.into_identity(),
        )
    }
}

/// Maps a non-success credential-grant status to the right error.
fn classify_sign_in_status(status: StatusCode) -> AuthError {
    if status == StatusCode::BAD_REQUEST
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::UNPROCESSABLE_ENTITY
    {
        AuthError::InvalidCredentials
    } else if status.is_server_error() {
        AuthError::ProviderUnreachable {
            reason: format!("provider returned {}", status),
        }
    } else {
        AuthError::Provider {
            reason: format!("unexpected status {}", status),
        }
    }
}

fn transport_error(e: &reqwest::Error) -> AuthError {
    AuthError::ProviderUnreachable {
        reason: e.to_string(),
    }
}

impl HttpIdentityProvider {
    /// Creates a provider client from configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, Report<AuthError>> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AuthError::Provider {
                reason: format!("failed to build http client: {}", e),
            })?;

        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            publishable_key: config.publishable_key.clone(),
            events,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolves an access token to the identity it belongs to.
    ///
    /// `Ok(None)` means the provider no longer accepts the token (expired
    /// or revoked); transport failures are errors.
    #[instrument(skip(self, access_token))]
    pub async fn user_for_token(
        &self,
        access_token: &str,
    ) -> Result<Option<UserIdentity>, AuthError> {
        let response = self
            .http
            .get(self.url("/user"))
            .header("apikey", &self.publishable_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        match response.status() {
            StatusCode::OK => {
                let user: WireUser = response.json().await.map_err(|e| AuthError::Provider {
                    reason: format!("malformed user response: {}", e),
                })?;
                Ok(Some(user.into_identity()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("access token rejected by provider");
                Ok(None)
            }
            status if status.is_server_error() => Err(AuthError::ProviderUnreachable {
                reason: format!("provider returned {}", status),
            }),
            status => Err(AuthError::Provider {
                reason: format!("unexpected status {}", status),
            }),
        }
    }

    /// Checks whether the provider's auth API is responding.
    pub async fn health(&self) -> Result<(), AuthError> {
        let response = self
            .http
            .get(self.url("/health"))
            .header("apikey", &self.publishable_key)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AuthError::ProviderUnreachable {
                reason: format!("health check returned {}", response.status()),
            })
        }
    }

    fn publish(&self, kind: SessionChangeKind, session: Option<Session>) {
        // Nobody listening is fine; send only fails without receivers.
        let _ = self.events.send(SessionChange { kind, session });
    }
}

#[async_trait::async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[instrument(skip(self, password))]
    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(self.url("/token?grant_type=password"))
            .header("apikey", &self.publishable_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "credential grant rejected");
            return Err(classify_sign_in_status(status));
        }

        let grant: TokenResponse = response.json().await.map_err(|e| AuthError::Provider {
            reason: format!("malformed token response: {}", e),
        })?;
        let session = grant.into_session();

        self.publish(SessionChangeKind::SignedIn, Some(session.clone()));

        Ok(session)
    }

    #[instrument(skip(self, password, metadata))]
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.url("/signup"))
            .header("apikey", &self.publishable_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": metadata,
            }))
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status.is_server_error() {
            return Err(AuthError::ProviderUnreachable {
                reason: format!("provider returned {}", status),
            });
        }

        // 4xx carries a provider message (duplicate email, weak password).
        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("msg")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("sign-up rejected with {}", status));

        Err(AuthError::Provider { reason })
    }

    #[instrument(skip(self, access_token))]
    async fn invalidate_session(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.url("/logout"))
            .header("apikey", &self.publishable_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        // A token the provider already rejects is as signed out as it gets.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            self.publish(SessionChangeKind::SignedOut, None);
            return Ok(());
        }

        if status.is_server_error() {
            Err(AuthError::ProviderUnreachable {
                reason: format!("provider returned {}", status),
            })
        } else {
            Err(AuthError::Provider {
                reason: format!("sign-out rejected with {}", status),
            })
        }
    }

    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        // One shared client serves every user; any session it remembered
        // would leak across requests. Restore-from-a-prior-visit is keyed
        // by the browser's cookie and resolved per request instead.
        Ok(None)
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.events.subscribe()
    }
}
