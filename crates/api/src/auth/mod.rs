//! Authentication.
//!
//! There are no accounts yet: every dashboard request acts as one fixed
//! guest identity. The identity is built once from the environment and
//! shared process-wide through [`provider`].

use std::sync::OnceLock;

use serde::Serialize;

/// The identity a request acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Resolves the current user.
#[derive(Debug, Clone)]
pub struct AuthProvider {
    guest: Identity,
}

impl AuthProvider {
    pub fn new(guest: Identity) -> Self {
        Self { guest }
    }

    /// Build the guest identity from environment variables.
    ///
    /// | Env Var            | Default              |
    /// |--------------------|----------------------|
    /// | `GUEST_USER_ID`    | `guest`              |
    /// | `GUEST_USER_NAME`  | `Guest`              |
    /// | `GUEST_USER_EMAIL` | `guest@example.com`  |
    pub fn from_env() -> Self {
        let var = |key: &str, default: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self::new(Identity {
            id: var("GUEST_USER_ID", "guest"),
            name: var("GUEST_USER_NAME", "Guest"),
            email: var("GUEST_USER_EMAIL", "guest@example.com"),
        })
    }

    /// The identity for the current request. Always present for now.
    pub fn current_user(&self) -> Option<&Identity> {
        Some(&self.guest)
    }
}

static PROVIDER: OnceLock<AuthProvider> = OnceLock::new();

/// The process-wide provider, built from the environment on first use.
pub fn provider() -> &'static AuthProvider {
    PROVIDER.get_or_init(AuthProvider::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_is_initialised_once() {
        let first = provider() as *const AuthProvider;
        let second = provider() as *const AuthProvider;
        assert_eq!(first, second);
        assert!(provider().current_user().is_some());
    }

    #[test]
    fn explicit_identity_is_returned() {
        let provider = AuthProvider::new(Identity {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
        });
        assert_eq!(provider.current_user().unwrap().name, "Ana");
    }
}
