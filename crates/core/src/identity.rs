//! The authenticated identity.

use secrecy::SecretString;
use serde::Deserialize;

use crate::types::Role;

/// The identity established by a successful sign-in.
///
/// At most one identity is active at a time; it is owned exclusively by the
/// entity store, set at sign-in and cleared at sign-out (or when the server
/// answers a call with 401).
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Server-side id of the signed-in account.
    pub user_id: i32,
    /// Role the server granted at sign-in.
    pub role: Role,
    token: SecretString,
}

impl Identity {
    /// Create an identity from a sign-in response.
    #[must_use]
    pub const fn new(user_id: i32, role: Role, token: SecretString) -> Self {
        Self {
            user_id,
            role,
            token,
        }
    }

    /// The bearer token attached to every authenticated request.
    ///
    /// Only the HTTP gateway should expose the inner secret.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let identity = Identity::new(9, Role::Admin, SecretString::from("jwt-value"));
        let rendered = format!("{identity:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("jwt-value"));
    }

    #[test]
    fn test_deserialize_sign_in_response() {
        let json = r#"{"userId": 4, "role": "CUSTOMER", "token": "abc.def.ghi"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.user_id, 4);
        assert_eq!(identity.role, Role::Customer);
    }
}
