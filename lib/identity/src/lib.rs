//! Session, role, and route-guard core for the TeleMedica portal.
//!
//! This crate provides:
//! - The session/role controller (`SessionController`), the single source
//!   of truth for "who is signed in and with what role"
//! - Role derivation from identity metadata (`Role`)
//! - The identity-provider boundary (`IdentityProvider`)
//! - Route-guard decisions for role-scoped dashboard areas (`guard`)
//!
//! # Access Control Model
//!
//! Authentication is delegated entirely to a hosted identity provider; the
//! portal only observes sessions. Authorization is a single `role` field in
//! the provider's user metadata, derived into one of three tiers (patient,
//! doctor, administrator) that each map to one dashboard area. Missing or
//! unrecognized metadata derives the patient tier.
//!
//! # Example
//!
//! ```
//! use telemedica_identity::{AuthSnapshot, GuardDecision, Role, Session, UserId, UserIdentity};
//! use chrono::Duration;
//!
//! // An identity as the provider reports it after sign-in.
//! let mut identity = UserIdentity::new(
//!     UserId::new("3f7c...".to_string()),
//!     "dr.garcia@example.com".to_string(),
//! );
//! identity.metadata_mut().insert(
//!     "role".to_string(),
//!     serde_json::Value::String("doctor".to_string()),
//! );
//!
//! let role = Role::for_identity(&identity);
//! assert_eq!(role, Role::Doctor);
//!
//! // A doctor opening the administrator area is sent to their own
//! // dashboard, not an error page.
//! let session = Session::new("tok".to_string(), None, Duration::hours(1), identity);
//! let snapshot = AuthSnapshot::authenticated(session, role);
//! assert_eq!(
//!     snapshot.guard(Role::Administrator),
//!     GuardDecision::RedirectToOwnArea(Role::Doctor),
//! );
//! ```

pub mod error;
pub mod guard;
pub mod role;
pub mod session;
pub mod state;
pub mod user;

#[cfg(feature = "controller")]
pub mod controller;
#[cfg(feature = "controller")]
pub mod provider;

// Re-export main types at crate root
pub use error::AuthError;
pub use guard::{GuardDecision, SIGN_IN_PATH, evaluate};
pub use role::{ROLE_METADATA_KEY, Role, apply_default_role};
pub use session::Session;
pub use state::AuthSnapshot;
pub use user::{UserId, UserIdentity};

#[cfg(feature = "controller")]
pub use controller::{ControllerConfig, Navigator, SessionController};
#[cfg(feature = "controller")]
pub use provider::{
    IdentityProvider, SESSION_EVENT_CAPACITY, SessionChange, SessionChangeKind,
};
