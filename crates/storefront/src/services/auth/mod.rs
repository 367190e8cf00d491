//! Authentication service.
//!
//! Login and sign-up are pass-through calls to a token-issuing API
//! (`reqres.in` compatible). This module only submits credentials and
//! returns the issued token; recording the signed-in user is the store's job.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use url::Url;

use pazar_core::Email;

/// Which auth call is being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    Register,
}

impl AuthFlow {
    const fn path(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }

    /// Message shown when the API rejects the request without saying why.
    #[must_use]
    pub const fn rejection_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Sign-up failed",
        }
    }
}

/// Validated credentials ready to submit.
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Client for the external auth API.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl AuthClient {
    /// Create a client rooted at `base_url`, e.g. `https://reqres.in/api`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url, api_key: Option<SecretString>) -> Self {
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            inner: Arc::new(AuthClientInner {
                client,
                base_url,
                api_key,
            }),
        }
    }

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` if the API refuses the credentials,
    /// `AuthError::MissingToken` if it answers without a token, and
    /// `AuthError::Transport` if the request cannot be completed.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<SecretString, AuthError> {
        self.submit(AuthFlow::Login, credentials).await
    }

    /// Register a new account. The returned token is not used to sign in.
    ///
    /// # Errors
    ///
    /// Same as [`AuthClient::login`].
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn register(&self, credentials: &Credentials) -> Result<SecretString, AuthError> {
        self.submit(AuthFlow::Register, credentials).await
    }

    async fn submit(
        &self,
        flow: AuthFlow,
        credentials: &Credentials,
    ) -> Result<SecretString, AuthError> {
        let url = self.inner.base_url.join(flow.path())?;
        let body = json!({
            "email": credentials.email.as_str(),
            "password": credentials.password.expose_secret(),
        });

        let mut request = self.inner.client.post(url).json(&body);
        if let Some(key) = &self.inner.api_key {
            request = request.header("x-api-key", key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| flow.rejection_message().to_string());
            tracing::warn!(status = %status, message = %message, "Auth API rejected request");
            return Err(AuthError::Rejected(message));
        }

        let token = serde_json::from_str::<TokenResponse>(&text)
            .ok()
            .and_then(|r| r.token)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        tracing::info!("Auth API issued token");
        Ok(SecretString::from(token))
    }
}
