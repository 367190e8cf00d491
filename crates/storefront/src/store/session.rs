//! Signed-in user.
//!
//! Holds at most one user. The token is opaque and issued by the external
//! auth API; it is kept secret and never serialized.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use pazar_core::Email;

/// The authenticated user.
#[derive(Clone, Serialize)]
pub struct User {
    pub email: Email,
    #[serde(skip)]
    pub token: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(email: Email, token: impl Into<String>) -> Self {
        Self {
            email,
            token: SecretString::from(token.into()),
            name: None,
        }
    }

    /// The bearer token, for callers that must forward it upstream.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing user unconditionally.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn clear_user(&mut self) {
        self.user = None;
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
