//! User identity as reported by the identity provider.

use serde::{Deserialize, Serialize};

/// Provider-issued user identifier.
///
/// Opaque to the portal; the identity provider is the system of record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID from a provider-issued string.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A user record as returned by the identity provider.
///
/// Carries the email address and the provider's free-form metadata map.
/// The `role` metadata field drives authorization (see
/// [`Role::for_identity`](crate::role::Role::for_identity)); everything
/// else (display name, profile fields) is pass-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Provider-issued user ID.
    id: UserId,
    /// The user's email address.
    email: String,
    /// Free-form profile metadata attached at sign-up.
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl UserIdentity {
    /// Creates an identity with an empty metadata map.
    #[must_use]
    pub fn new(id: UserId, email: String) -> Self {
        Self {
            id,
            email,
            metadata: serde_json::Map::new(),
        }
    }

    /// Creates an identity with the given metadata map.
    #[must_use]
    pub fn with_metadata(
        id: UserId,
        email: String,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            id,
            email,
            metadata,
        }
    }

    /// Returns the provider-issued user ID.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the profile metadata map.
    #[must_use]
    pub fn metadata(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.metadata
    }

    /// Returns a mutable reference to the profile metadata map.
    pub fn metadata_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
        &mut self.metadata
    }

    /// Returns the user's full name from metadata, if present.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.metadata.get("full_name").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_id_display() {
        let id = UserId::new("usr_abc".to_string());
        assert_eq!(id.to_string(), "usr_abc");
    }

    #[test]
    fn user_id_from_str() {
        let id: UserId = "usr_abc".into();
        assert_eq!(id.as_str(), "usr_abc");
    }

    #[test]
    fn new_identity_has_empty_metadata() {
        let identity = UserIdentity::new(UserId::new("usr_1".to_string()), "a@b.example".to_string());
        assert_eq!(identity.email(), "a@b.example");
        assert!(identity.metadata().is_empty());
        assert!(identity.full_name().is_none());
    }

    #[test]
    fn full_name_reads_metadata() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("full_name".to_string(), json!("Ada Lovelace"));
        let identity = UserIdentity::with_metadata(
            UserId::new("usr_1".to_string()),
            "ada@example.com".to_string(),
            metadata,
        );
        assert_eq!(identity.full_name(), Some("Ada Lovelace"));
    }

    #[test]
    fn serialization_roundtrip() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("role".to_string(), json!("doctor"));
        let identity = UserIdentity::with_metadata(
            UserId::new("usr_1".to_string()),
            "doc@example.com".to_string(),
            metadata,
        );
        let json = serde_json::to_string(&identity).expect("serialize");
        let parsed: UserIdentity = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(identity, parsed);
    }

    #[test]
    fn deserialization_tolerates_missing_metadata() {
        let parsed: UserIdentity =
            serde_json::from_str(r#"{"id":"usr_1","email":"a@b.example"}"#).expect("deserialize");
        assert!(parsed.metadata().is_empty());
    }
}
