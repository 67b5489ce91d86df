//! Authentication routes for sign-in, sign-up, and sign-out.
//!
//! These are plain form-post handlers: the pages submit standard HTML
//! forms, and outcomes come back as redirects with `error`/`notice` query
//! codes the pages render. Failed attempts re-land on the form they came
//! from; successful sign-in lands on the dashboard for the user's role.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use telemedica_identity::provider::IdentityProvider;
use telemedica_identity::{AuthError, Role, Session, apply_default_role};
use time::Duration as TimeDuration;

use super::AppState;
use crate::server_helpers::SESSION_COOKIE;

/// Sign-in form fields.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form fields.
#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// Requested role; anything unrecognized falls back to patient.
    #[serde(default)]
    pub role: String,
}

/// Stable query-string codes for auth failures.
///
/// The pages map these back to human-readable copy; the raw provider
/// message never reaches the URL bar.
fn error_code(error: &AuthError) -> &'static str {
    match error {
        AuthError::InvalidCredentials => "invalid_credentials",
        AuthError::ProviderUnreachable { .. } => "provider_unreachable",
        AuthError::DuplicateSubmission => "duplicate_submission",
        AuthError::SessionExpired => "session_expired",
        AuthError::Provider { .. } => "sign_up_rejected",
    }
}

fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    // Cookie lifetime tracks the token lifetime, so an expired token never
    // outlives its cookie by much.
    let remaining = (session.expires_at() - Utc::now()).num_seconds().max(0);

    Cookie::build((SESSION_COOKIE, session.access_token().to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::seconds(remaining))
        .build()
}

fn remove_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO)
        .build()
}

// In-flight keys for duplicate-submission suppression. Sign-in and
// sign-up are keyed by the account, so a double-clicked submit cannot
// launch two parallel provider calls for it; sign-out is keyed by the
// token being invalidated.
fn sign_in_key(email: &str) -> String {
    format!("sign-in:{}", email.trim().to_lowercase())
}

fn sign_up_key(email: &str) -> String {
    format!("sign-up:{}", email.trim().to_lowercase())
}

fn sign_out_key(token: &str) -> String {
    format!("sign-out:{token}")
}

/// Verifies credentials with the identity provider and establishes the
/// session cookie.
///
/// Success redirects to the dashboard for the signed-in user's role, as a
/// replace-style navigation chain (form post, then redirect), so the
/// credentials post never re-runs from history. A second submit for the
/// same account while one is outstanding is suppressed without a second
/// provider call.
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> impl IntoResponse {
    let Some(_claim) = state.submissions.claim(sign_in_key(&form.email)) else {
        tracing::debug!("sign-in already in progress; suppressing duplicate submission");
        let target = format!(
            "/sign-in?error={}",
            error_code(&AuthError::DuplicateSubmission)
        );
        return (jar, Redirect::to(&target)).into_response();
    };

    match state
        .provider
        .sign_in_with_credentials(&form.email, &form.password)
        .await
    {
        Ok(session) => {
            let role = Role::for_identity(session.user());
            tracing::info!(user_id = %session.user().id(), %role, "User signed in");

            let cookie = session_cookie(&session, state.session_config.secure_cookies);
            (jar.add(cookie), Redirect::to(role.dashboard_path())).into_response()
        }
        Err(error) => {
            tracing::info!(%error, "Sign-in rejected");
            let target = format!("/sign-in?error={}", error_code(&error));
            (jar, Redirect::to(&target)).into_response()
        }
    }
}

/// Creates an account with the identity provider.
///
/// Does not establish a session; the provider requires email confirmation
/// before the first sign-in, so success lands on the sign-in page with a
/// confirmation notice.
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignUpForm>,
) -> impl IntoResponse {
    let Some(_claim) = state.submissions.claim(sign_up_key(&form.email)) else {
        tracing::debug!("sign-up already in progress; suppressing duplicate submission");
        return Redirect::to("/sign-up?error=duplicate_submission");
    };

    let mut metadata = serde_json::Map::new();
    metadata.insert(
        "full_name".to_string(),
        serde_json::Value::String(form.full_name.trim().to_string()),
    );
    if let Some(role) = Role::parse(&form.role) {
        metadata.insert(
            "role".to_string(),
            serde_json::Value::String(role.as_str().to_string()),
        );
    }
    // Accounts created without an explicit tier are patients.
    apply_default_role(&mut metadata);

    match state
        .provider
        .create_account(&form.email, &form.password, metadata)
        .await
    {
        Ok(()) => {
            tracing::info!("Account created, awaiting confirmation");
            Redirect::to("/sign-in?notice=confirm_email")
        }
        Err(error) => {
            tracing::info!(%error, "Sign-up rejected");
            Redirect::to(match error {
                AuthError::ProviderUnreachable { .. } => "/sign-up?error=provider_unreachable",
                _ => "/sign-up?error=sign_up_rejected",
            })
        }
    }
}

/// Signs the user out: invalidates the token with the provider, clears the
/// cookie, and lands on the sign-in page.
///
/// If the provider cannot be reached the session is kept intact (cookie
/// included) and the user lands on the home page, still signed in. A
/// second sign-out for the same token while one is outstanding is
/// suppressed, so the token is never invalidated twice.
pub async fn sign_out(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        // Nothing to do for an anonymous visitor.
        return (jar, Redirect::to("/sign-in")).into_response();
    };

    let Some(_claim) = state.submissions.claim(sign_out_key(&token)) else {
        tracing::debug!("sign-out already in progress; suppressing duplicate submission");
        return (jar, Redirect::to("/")).into_response();
    };

    match state.provider.invalidate_session(&token).await {
        Ok(()) => {
            tracing::info!("User signed out");
            (jar.add(remove_session_cookie()), Redirect::to("/sign-in")).into_response()
        }
        Err(error) => {
            tracing::warn!(%error, "Sign-out failed, keeping session");
            (jar, Redirect::to("/")).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use telemedica_identity::{UserId, UserIdentity};

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(error_code(&AuthError::InvalidCredentials), "invalid_credentials");
        assert_eq!(
            error_code(&AuthError::ProviderUnreachable {
                reason: "timeout".to_string()
            }),
            "provider_unreachable"
        );
        assert_eq!(error_code(&AuthError::SessionExpired), "session_expired");
    }

    #[test]
    fn session_cookie_tracks_token_lifetime() {
        let session = Session::new(
            "at_1".to_string(),
            None,
            Duration::hours(1),
            UserIdentity::new(UserId::new("usr_1".to_string()), "a@b.example".to_string()),
        );
        let cookie = session_cookie(&session, true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "at_1");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        let max_age = cookie.max_age().expect("max age set");
        assert!(max_age > TimeDuration::minutes(59));
        assert!(max_age <= TimeDuration::hours(1));
    }

    #[test]
    fn double_submit_for_same_account_is_suppressed() {
        let submissions = crate::auth::InFlightSubmissions::default();

        // First submit claims the account; a second one for the same
        // account must not get a claim, so no second provider call can
        // start.
        let first = submissions.claim(sign_in_key("ada@example.com"));
        assert!(first.is_some());
        assert!(submissions.claim(sign_in_key("ada@example.com")).is_none());

        // Once the first attempt finishes, the account can submit again.
        drop(first);
        assert!(submissions.claim(sign_in_key("ada@example.com")).is_some());
    }

    #[test]
    fn double_sign_out_invalidates_once() {
        let submissions = crate::auth::InFlightSubmissions::default();
        let _first = submissions.claim(sign_out_key("at_1")).expect("first claim");
        assert!(submissions.claim(sign_out_key("at_1")).is_none());
    }

    #[test]
    fn sign_in_key_collapses_case_and_whitespace() {
        assert_eq!(
            sign_in_key(" Ada@Example.com "),
            sign_in_key("ada@example.com")
        );
        assert_ne!(sign_in_key("a@b.example"), sign_up_key("a@b.example"));
    }

    #[test]
    fn expired_session_cookie_does_not_go_negative() {
        let session = Session::new(
            "at_1".to_string(),
            None,
            Duration::seconds(-30),
            UserIdentity::new(UserId::new("usr_1".to_string()), "a@b.example".to_string()),
        );
        let cookie = session_cookie(&session, false);
        assert_eq!(cookie.max_age(), Some(TimeDuration::ZERO));
    }
}
