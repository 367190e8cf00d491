//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while talking to the external auth API.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The API refused the credentials. Holds the message to show the user.
    #[error("{0}")]
    Rejected(String),

    /// The API answered with success but no token.
    #[error("auth response did not contain a token")]
    MissingToken,

    /// The request never completed (DNS, connection, TLS, body read).
    #[error("auth request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The auth endpoint URL could not be built.
    #[error("invalid auth URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
