//! The access gate.
//!
//! Every protected view consults the gate before rendering or fetching.
//! The check is re-evaluated on every mount (the identity can change between
//! mounts), performs no caching, and has no side effects beyond reading the
//! store - redirecting and emitting the reason are the view's job.

use coupon_market_core::Role;

use crate::error::ErrorKind;
use crate::notify::messages;
use crate::store::EntityStore;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated visitors with the wrong role are sent.
pub const HOME_PATH: &str = "/";

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Render the view and let it fetch.
    Allow,
    /// Navigate away and surface the reason.
    Redirect {
        path: &'static str,
        reason: ErrorKind,
    },
}

/// Evaluate identity and required role against the store's identity slice.
///
/// Rules, in order: no identity redirects to the login page; a role mismatch
/// redirects home; otherwise the view is allowed. `None` means the view only
/// requires a signed-in identity, not a particular role.
#[must_use]
pub fn check_access(store: &EntityStore, required: Option<Role>) -> AccessDecision {
    let Some(identity) = store.identity() else {
        return AccessDecision::Redirect {
            path: LOGIN_PATH,
            reason: ErrorKind::Unauthenticated,
        };
    };

    match required {
        Some(role) if identity.role != role => AccessDecision::Redirect {
            path: HOME_PATH,
            reason: ErrorKind::Forbidden(messages::ACCESS_DENIED.to_owned()),
        },
        _ => AccessDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use coupon_market_core::Identity;
    use secrecy::SecretString;

    use super::*;

    fn store_with(role: Role) -> EntityStore {
        let store = EntityStore::new();
        store.set_identity(Identity::new(1, role, SecretString::from("token")));
        store
    }

    #[test]
    fn test_no_identity_redirects_to_login() {
        let store = EntityStore::new();
        assert_eq!(
            check_access(&store, Some(Role::Admin)),
            AccessDecision::Redirect {
                path: LOGIN_PATH,
                reason: ErrorKind::Unauthenticated,
            }
        );
    }

    #[test]
    fn test_role_mismatch_redirects_home() {
        let store = store_with(Role::Customer);
        assert_eq!(
            check_access(&store, Some(Role::Admin)),
            AccessDecision::Redirect {
                path: HOME_PATH,
                reason: ErrorKind::Forbidden("access denied".to_owned()),
            }
        );
    }

    #[test]
    fn test_matching_role_is_allowed() {
        let store = store_with(Role::Company);
        assert_eq!(check_access(&store, Some(Role::Company)), AccessDecision::Allow);
    }

    #[test]
    fn test_no_required_role_only_needs_identity() {
        let store = store_with(Role::Customer);
        assert_eq!(check_access(&store, None), AccessDecision::Allow);
    }

    #[test]
    fn test_reevaluated_after_identity_change() {
        let store = store_with(Role::Admin);
        assert_eq!(check_access(&store, Some(Role::Admin)), AccessDecision::Allow);

        store.clear_identity();
        assert!(matches!(
            check_access(&store, Some(Role::Admin)),
            AccessDecision::Redirect {
                path: LOGIN_PATH,
                ..
            }
        ));
    }
}
