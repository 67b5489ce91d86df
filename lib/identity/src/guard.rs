//! Route-guard decisions for role-scoped dashboard areas.
//!
//! Guards own no state: they read the controller's `(loading, session,
//! role)` tuple and decide. Earlier portal revisions let each dashboard
//! page compute its own redirect from possibly-stale state, which produced
//! redirect loops and premature redirects during session restore. The one
//! decision function lives here; every guard surface calls it.

use crate::role::Role;
use crate::state::AuthSnapshot;

/// Path of the sign-in entry point, the redirect target for anonymous
/// visitors.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// What a route guard should do for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Authentication is still resolving; render a waiting indicator and
    /// do not redirect yet.
    Wait,
    /// Nobody is signed in; redirect to the sign-in entry point.
    RedirectToSignIn,
    /// A user is signed in but belongs to a different area; redirect to
    /// their own dashboard rather than an error page.
    RedirectToOwnArea(Role),
    /// Render the protected content.
    Allow,
}

impl GuardDecision {
    /// Returns the redirect path, if this decision redirects.
    #[must_use]
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Self::Wait | Self::Allow => None,
            Self::RedirectToSignIn => Some(SIGN_IN_PATH),
            Self::RedirectToOwnArea(role) => Some(role.dashboard_path()),
        }
    }
}

/// Decides what a guard for `required`-role content should do.
///
/// All redirects issued from this decision must replace the current
/// navigation entry, so back-navigation does not return to the gated page.
#[must_use]
pub fn evaluate(
    loading: bool,
    authenticated: bool,
    role: Option<Role>,
    required: Role,
) -> GuardDecision {
    if loading {
        return GuardDecision::Wait;
    }
    if !authenticated {
        return GuardDecision::RedirectToSignIn;
    }
    match role {
        Some(role) if role == required => GuardDecision::Allow,
        // Wrong area: send the user to their own dashboard.
        Some(role) => GuardDecision::RedirectToOwnArea(role),
        // Unreachable while the controller invariant holds; fail safe.
        None => GuardDecision::RedirectToSignIn,
    }
}

impl AuthSnapshot {
    /// Evaluates the guard decision for this snapshot.
    #[must_use]
    pub fn guard(&self, required: Role) -> GuardDecision {
        evaluate(
            self.is_loading(),
            self.is_authenticated(),
            self.role(),
            required,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::user::{UserId, UserIdentity};
    use chrono::Duration;

    const ALL_ROLES: [Role; 3] = [Role::Patient, Role::Doctor, Role::Administrator];

    fn session_for(role: Role) -> Session {
        let mut identity = UserIdentity::new(
            UserId::new("usr_1".to_string()),
            "person@example.com".to_string(),
        );
        identity.metadata_mut().insert(
            "role".to_string(),
            serde_json::Value::String(role.as_str().to_string()),
        );
        Session::new("tok".to_string(), None, Duration::hours(1), identity)
    }

    #[test]
    fn loading_never_redirects() {
        for required in ALL_ROLES {
            assert_eq!(
                evaluate(true, false, None, required),
                GuardDecision::Wait,
                "loading guard must wait for {required}"
            );
            // Even with a session and a mismatched role present.
            assert_eq!(
                evaluate(true, true, Some(Role::Doctor), required),
                GuardDecision::Wait
            );
        }
    }

    #[test]
    fn anonymous_redirects_to_sign_in_for_every_area() {
        for required in ALL_ROLES {
            let decision = evaluate(false, false, None, required);
            assert_eq!(decision, GuardDecision::RedirectToSignIn);
            assert_eq!(decision.redirect_path(), Some("/sign-in"));
        }
    }

    #[test]
    fn matching_role_is_allowed() {
        for required in ALL_ROLES {
            assert_eq!(
                evaluate(false, true, Some(required), required),
                GuardDecision::Allow
            );
        }
    }

    #[test]
    fn doctor_visiting_admin_area_goes_to_doctor_dashboard() {
        let decision = evaluate(false, true, Some(Role::Doctor), Role::Administrator);
        assert_eq!(decision, GuardDecision::RedirectToOwnArea(Role::Doctor));
        assert_eq!(decision.redirect_path(), Some("/doctor"));
    }

    #[test]
    fn wrong_role_always_redirects_to_own_area() {
        for actual in ALL_ROLES {
            for required in ALL_ROLES {
                if actual == required {
                    continue;
                }
                let decision = evaluate(false, true, Some(actual), required);
                assert_eq!(decision, GuardDecision::RedirectToOwnArea(actual));
                assert_eq!(decision.redirect_path(), Some(actual.dashboard_path()));
            }
        }
    }

    #[test]
    fn snapshot_guard_matches_evaluate() {
        let snapshot = AuthSnapshot::authenticated(session_for(Role::Patient), Role::Patient);
        assert_eq!(snapshot.guard(Role::Patient), GuardDecision::Allow);
        assert_eq!(
            snapshot.guard(Role::Administrator),
            GuardDecision::RedirectToOwnArea(Role::Patient)
        );
        assert_eq!(
            AuthSnapshot::loading().guard(Role::Patient),
            GuardDecision::Wait
        );
        assert_eq!(
            AuthSnapshot::anonymous().guard(Role::Doctor),
            GuardDecision::RedirectToSignIn
        );
    }
}
