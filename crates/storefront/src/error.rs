//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Upstream failures are
//! captured to Sentry before the JSON error body is sent.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::services::auth::{AuthError, AuthFlow};
use crate::validation::FieldErrors;

const CATALOG_FAILURE_MESSAGE: &str = "Could not load products. Please try again.";
const AUTH_UNREACHABLE_MESSAGE: &str =
    "Could not reach the authentication service. Check your connection.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A catalog endpoint failed; the whole listing is discarded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Login or sign-up did not produce a token.
    #[error("Auth error ({flow:?}): {source}")]
    Auth {
        flow: AuthFlow,
        #[source]
        source: AuthError,
    },

    /// One or more form fields are invalid.
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub const fn auth(flow: AuthFlow, source: AuthError) -> Self {
        Self::Auth { flow, source }
    }

    const fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Catalog(_)
                | Self::Internal(_)
                | Self::Auth {
                    source: AuthError::Transport(_) | AuthError::InvalidUrl(_),
                    ..
                }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_upstream_failure() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, body) = match self {
            Self::Catalog(_) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": CATALOG_FAILURE_MESSAGE, "retryable": true }),
            ),
            Self::Auth { flow, source } => match source {
                AuthError::Rejected(message) => {
                    (StatusCode::UNAUTHORIZED, json!({ "error": message }))
                }
                AuthError::MissingToken => (
                    StatusCode::UNAUTHORIZED,
                    json!({ "error": flow.rejection_message() }),
                ),
                AuthError::Transport(_) | AuthError::InvalidUrl(_) => (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": AUTH_UNREACHABLE_MESSAGE }),
                ),
            },
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "errors": errors }),
            ),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, json!({ "error": what })),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            // Don't expose internal error details to clients
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate Sentry events with the signed-in user.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
