//! The session/role controller: the single source of truth for "who is
//! signed in and with what role".
//!
//! One controller is constructed at application start and handed to views
//! by dependency injection; views only read the published
//! [`AuthSnapshot`] and invoke the sign-in/sign-up/sign-out operations.
//! State changes flow through exactly one apply path, so the push
//! notification stream, the bootstrap session fetch, and interactive
//! sign-in all converge on the same derivation logic.
//!
//! Ordering rule for initialization: the controller subscribes to the
//! provider's push stream before issuing the one-shot bootstrap fetch, and
//! the push channel is authoritative. Once any push notification has been
//! applied, a later-arriving bootstrap result is discarded.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::guard::SIGN_IN_PATH;
use crate::provider::{IdentityProvider, SessionChange, SessionChangeKind};
use crate::role::{self, Role};
use crate::session::Session;
use crate::state::AuthSnapshot;
use crate::user::UserIdentity;

/// Navigation seam for redirect side effects.
///
/// Redirects are issued only from the controller's state-update path, never
/// computed independently by views, and always replace the current
/// navigation entry so back-navigation cannot return to a gated page.
pub trait Navigator: Send + Sync + 'static {
    /// Replaces the current navigation entry with `path`.
    fn replace(&self, path: &str);
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn replace(&self, path: &str) {
        (**self).replace(path);
    }
}

/// Controller tuning knobs.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Upper bound on the bootstrap session fetch. An unreachable provider
    /// resolves to Anonymous instead of leaving the application loading
    /// forever.
    pub bootstrap_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            bootstrap_timeout: Duration::from_secs(10),
        }
    }
}

/// Where a state update came from; decides whether it navigates.
#[derive(Debug, Clone, Copy)]
enum ApplySource {
    /// `sign_in` returned successfully.
    InteractiveSignIn,
    /// `sign_out` completed against the provider.
    InteractiveSignOut,
    /// The provider pushed a signed-in notification.
    PushSignedIn,
    /// The provider pushed a sign-out/revocation notification.
    PushSignedOut,
    /// The provider refreshed tokens for the existing session.
    TokenRefresh,
    /// The one-shot bootstrap fetch resolved.
    Bootstrap,
}

impl ApplySource {
    fn is_push(self) -> bool {
        matches!(
            self,
            Self::PushSignedIn | Self::PushSignedOut | Self::TokenRefresh
        )
    }
}

struct Shared<N> {
    navigator: N,
    state: watch::Sender<AuthSnapshot>,
    apply_gate: Mutex<ApplyState>,
}

struct ApplyState {
    /// Set once any push notification has been applied; bootstrap results
    /// arriving afterwards are discarded.
    push_seen: bool,
}

impl<N: Navigator> Shared<N> {
    /// The single state-update path. Every session resolution, from every
    /// source, goes through here.
    async fn apply(&self, session: Option<Session>, source: ApplySource) {
        let mut gate = self.apply_gate.lock().await;
        if matches!(source, ApplySource::Bootstrap) && gate.push_seen {
            debug!("discarding bootstrap fetch result; push notification already applied");
            return;
        }
        if source.is_push() {
            gate.push_seen = true;
        }

        // An expired session is no session.
        let session = match session {
            Some(session) if session.is_expired() => {
                debug!(source = ?source, "provider reported an expired session");
                None
            }
            other => other,
        };

        let previous = self.state.borrow().clone();
        match session {
            Some(session) => {
                let signed_in_role = Role::for_identity(session.user());
                let role_changed = previous.role() != Some(signed_in_role);
                self.state
                    .send_replace(AuthSnapshot::authenticated(session, signed_in_role));
                // Redundant signed-in notifications with an unchanged role
                // must not re-trigger a redirect.
                let navigate = role_changed
                    && matches!(
                        source,
                        ApplySource::InteractiveSignIn | ApplySource::PushSignedIn
                    );
                if navigate {
                    info!(role = %signed_in_role, "signed in; redirecting to dashboard");
                    self.navigator.replace(signed_in_role.dashboard_path());
                }
            }
            None => {
                let was_authenticated = previous.is_authenticated();
                self.state.send_replace(AuthSnapshot::anonymous());
                let navigate = was_authenticated
                    && matches!(
                        source,
                        ApplySource::InteractiveSignOut | ApplySource::PushSignedOut
                    );
                if navigate {
                    info!("session ended; returning to sign-in");
                    self.navigator.replace(SIGN_IN_PATH);
                }
            }
        }
    }

    async fn apply_change(&self, change: SessionChange) {
        let source = match change.kind {
            SessionChangeKind::SignedIn => ApplySource::PushSignedIn,
            SessionChangeKind::SignedOut => ApplySource::PushSignedOut,
            SessionChangeKind::TokenRefreshed => ApplySource::TokenRefresh,
        };
        self.apply(change.session, source).await;
    }
}

struct InitState {
    started: bool,
    tasks: Vec<JoinHandle<()>>,
}

/// The session/role controller.
///
/// Generic over the identity provider (the hosted service in production, a
/// mock in tests) and the navigator (browser history in production, a
/// recorder in tests).
pub struct SessionController<P, N> {
    provider: Arc<P>,
    shared: Arc<Shared<N>>,
    config: ControllerConfig,
    init: StdMutex<InitState>,
    sign_in_gate: Mutex<()>,
    sign_up_gate: Mutex<()>,
    sign_out_gate: Mutex<()>,
}

impl<P, N> SessionController<P, N>
where
    P: IdentityProvider + 'static,
    N: Navigator,
{
    /// Creates a controller with default configuration. The published
    /// state starts as loading until [`initialize`](Self::initialize)
    /// resolves the first session.
    #[must_use]
    pub fn new(provider: Arc<P>, navigator: N) -> Self {
        Self::with_config(provider, navigator, ControllerConfig::default())
    }

    /// Creates a controller with explicit configuration.
    #[must_use]
    pub fn with_config(provider: Arc<P>, navigator: N, config: ControllerConfig) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::loading());
        Self {
            provider,
            shared: Arc::new(Shared {
                navigator,
                state,
                apply_gate: Mutex::new(ApplyState { push_seen: false }),
            }),
            config,
            init: StdMutex::new(InitState {
                started: false,
                tasks: Vec::new(),
            }),
            sign_in_gate: Mutex::new(()),
            sign_up_gate: Mutex::new(()),
            sign_out_gate: Mutex::new(()),
        }
    }

    /// Starts session resolution: subscribes to the provider's push stream,
    /// then issues the one-shot bootstrap fetch for a pre-existing session.
    ///
    /// Idempotent; a second call is a no-op. Must be called from within a
    /// tokio runtime.
    pub fn initialize(&self) {
        let mut init = match self.init.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if init.started {
            debug!("session controller already initialized");
            return;
        }
        init.started = true;
        self.shared.state.send_replace(AuthSnapshot::loading());

        // Subscribe before fetching so no notification can be missed.
        let mut events = self.provider.subscribe();
        let shared = Arc::clone(&self.shared);
        init.tasks.push(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(change) => shared.apply_change(change).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session-change stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));

        let shared = Arc::clone(&self.shared);
        let provider = Arc::clone(&self.provider);
        let bootstrap_timeout = self.config.bootstrap_timeout;
        init.tasks.push(tokio::spawn(async move {
            let session = match tokio::time::timeout(bootstrap_timeout, provider.current_session())
                .await
            {
                Ok(Ok(session)) => session,
                Ok(Err(err)) => {
                    warn!(error = %err, "bootstrap session fetch failed; resolving as signed out");
                    None
                }
                Err(_) => {
                    warn!(
                        timeout_ms = bootstrap_timeout.as_millis() as u64,
                        "bootstrap session fetch timed out; resolving as signed out"
                    );
                    None
                }
            };
            shared.apply(session, ApplySource::Bootstrap).await;
        }));
    }

    /// Verifies credentials with the provider and, on success, publishes
    /// the new session and redirects to the derived role's dashboard.
    ///
    /// A failed attempt leaves the published state untouched. A call made
    /// while another sign-in is outstanding returns
    /// [`AuthError::DuplicateSubmission`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let Ok(_gate) = self.sign_in_gate.try_lock() else {
            debug!("sign-in already in progress; suppressing duplicate submission");
            return Err(AuthError::DuplicateSubmission);
        };
        let session = self.provider.sign_in_with_credentials(email, password).await?;
        let identity = session.user().clone();
        self.shared
            .apply(Some(session), ApplySource::InteractiveSignIn)
            .await;
        Ok(identity)
    }

    /// Creates an account with the provider, defaulting the `role` profile
    /// field to `patient` when absent.
    ///
    /// Does not establish a session; the provider requires the user to
    /// confirm their address before the first sign-in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        mut metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), AuthError> {
        let Ok(_gate) = self.sign_up_gate.try_lock() else {
            debug!("sign-up already in progress; suppressing duplicate submission");
            return Err(AuthError::DuplicateSubmission);
        };
        role::apply_default_role(&mut metadata);
        self.provider.create_account(email, password, metadata).await?;
        info!("account created; awaiting confirmation");
        Ok(())
    }

    /// Invalidates the current session with the provider, clears the
    /// published state, and navigates to the sign-in entry point.
    ///
    /// The loading flag is held for the duration of the provider call so
    /// guards wait instead of flashing unauthenticated content. A failed
    /// sign-out leaves the authenticated state intact.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Ok(_gate) = self.sign_out_gate.try_lock() else {
            debug!("sign-out already in progress; suppressing duplicate submission");
            return Err(AuthError::DuplicateSubmission);
        };
        let previous = self.snapshot();
        let Some(access_token) = previous.session().map(|s| s.access_token().to_string()) else {
            debug!("sign-out requested without an active session");
            return Ok(());
        };
        self.shared
            .state
            .send_replace(previous.clone().with_loading());
        match self.provider.invalidate_session(&access_token).await {
            Ok(()) => {
                self.shared
                    .apply(None, ApplySource::InteractiveSignOut)
                    .await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "sign-out failed; keeping authenticated state");
                // Restore unless a push notification resolved the state
                // while the provider call was in flight.
                if self.shared.state.borrow().is_loading() {
                    self.shared.state.send_replace(previous);
                }
                Err(err)
            }
        }
    }

    /// Returns the current published state.
    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Subscribes to published state changes.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<AuthSnapshot> {
        self.shared.state.subscribe()
    }
}

impl<P, N> Drop for SessionController<P, N> {
    fn drop(&mut self) {
        if let Ok(init) = self.init.lock() {
            for task in &init.tasks {
                task.abort();
            }
        }
    }
}
