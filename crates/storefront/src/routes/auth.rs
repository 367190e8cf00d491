//! Authentication route handlers.
//!
//! Forms are validated locally before anything is sent upstream. A
//! successful login records the user in the session; registration only
//! confirms the account and leaves the caller signed out.

use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::instrument;

use pazar_core::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::services::auth::AuthFlow;
use crate::state::AppState;
use crate::store::{Intent, Session, User};
use crate::validation::{LoginForm, SignUpForm};

/// Current session as seen by the client. Never includes the token.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    pub user: Option<User>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            authenticated: session.is_authenticated(),
            user: session.user().cloned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredView {
    pub registered: bool,
    pub email: Email,
}

/// Log in and record the user.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionView>> {
    let credentials = form.validate()?;
    let token = state
        .auth()
        .login(&credentials)
        .await
        .map_err(|e| AppError::auth(AuthFlow::Login, e))?;

    let user = User::new(credentials.email, token.expose_secret());
    set_sentry_user(user.email.as_str());

    let mut store = state.store().write().await;
    store.dispatch(Intent::SetUser(user));
    Ok(Json(SessionView::from(store.session())))
}

/// Create an account. The caller logs in separately afterwards.
#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<SignUpForm>,
) -> Result<Json<RegisteredView>> {
    let credentials = form.validate()?;
    state
        .auth()
        .register(&credentials)
        .await
        .map_err(|e| AppError::auth(AuthFlow::Register, e))?;

    Ok(Json(RegisteredView {
        registered: true,
        email: credentials.email,
    }))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Json<SessionView> {
    let mut store = state.store().write().await;
    store.dispatch(Intent::ClearUser);
    clear_sentry_user();
    Json(SessionView::from(store.session()))
}

#[instrument(skip(state))]
pub async fn me(State(state): State<AppState>) -> Json<SessionView> {
    Json(SessionView::from(state.store().read().await.session()))
}
