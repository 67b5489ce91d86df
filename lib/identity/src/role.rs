//! Authorization roles and the single role-derivation function.
//!
//! A user's role is never persisted by this crate. It is recomputed from the
//! identity's metadata on every state change, and every code path that needs
//! a role goes through [`Role::for_identity`]. Earlier revisions of the
//! portal carried several slightly different copies of this derivation; the
//! one implementation here is deliberate.

use serde::{Deserialize, Serialize};

use crate::user::UserIdentity;

/// Metadata key holding the user's role.
pub const ROLE_METADATA_KEY: &str = "role";

/// Authorization tier for the portal, derived from identity metadata.
///
/// Each role maps to exactly one dashboard area. Unknown or missing
/// metadata derives [`Role::Patient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A patient using the portal for their own care.
    Patient,
    /// A doctor providing consultations.
    Doctor,
    /// A platform administrator.
    Administrator,
}

impl Role {
    /// Derives the role for a user identity.
    ///
    /// Reads the `role` field of the identity's metadata; anything other
    /// than a recognized role string (including a missing or non-string
    /// value) derives `Patient`.
    #[must_use]
    pub fn for_identity(identity: &UserIdentity) -> Self {
        identity
            .metadata()
            .get(ROLE_METADATA_KEY)
            .and_then(|value| value.as_str())
            .and_then(Self::parse)
            .unwrap_or(Self::Patient)
    }

    /// Parses a role string; returns `None` for unrecognized values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "patient" => Some(Self::Patient),
            "doctor" => Some(Self::Doctor),
            "administrator" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Returns the lowercase wire form of this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Administrator => "administrator",
        }
    }

    /// Returns the dashboard area path for this role.
    ///
    /// These three paths are the only role-based redirect targets in the
    /// application.
    #[must_use]
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Self::Patient => "/patient",
            Self::Doctor => "/doctor",
            Self::Administrator => "/admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attaches the default `patient` role to sign-up metadata when absent.
///
/// Account creation and role derivation must agree on the default; this is
/// the only place the sign-up default is applied.
pub fn apply_default_role(metadata: &mut serde_json::Map<String, serde_json::Value>) {
    if !metadata.contains_key(ROLE_METADATA_KEY) {
        metadata.insert(
            ROLE_METADATA_KEY.to_string(),
            serde_json::Value::String(Role::Patient.as_str().to_string()),
        );
    }
}
