//! Authentication route handlers.
//!
//! All credential checks happen backend-side; these handlers exchange
//! credentials for a bearer token and keep the resulting identity in the
//! session. A 401 from the backend at any later point clears that
//! identity again (see `error::AppError`).

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use velvet_loom_core::{Email, UserId};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Forms
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Forgot-password request body.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Reset-password request body.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub new_password: String,
}

// =============================================================================
// Responses
// =============================================================================

/// The session identity as exposed to the client.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: String,
}

impl From<&CurrentUser> for SessionUser {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

/// Simple message payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle login.
///
/// Exchanges credentials at the backend token endpoint and stores the
/// identity (and bearer token) in the session.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionUser>> {
    let token = state.backend().login(&form.email, &form.password).await?;

    let user = CurrentUser::from_user(token.user, token.access_token);
    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(SessionUser::from(&user)))
}

/// Handle registration, then log the new account in.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<SessionUser>)> {
    // Surface malformed emails before a backend round-trip.
    Email::parse(&form.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .backend()
        .register(&form.name, &form.email, &form.password)
        .await?;

    // The register endpoint returns no token; log in to get one.
    let token = state.backend().login(&form.email, &form.password).await?;
    let user = CurrentUser::from_user(token.user, token.access_token);
    set_current_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(SessionUser::from(&user))))
}

/// Handle logout: drop the session identity.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current session identity, or 204 when nobody is logged in.
#[instrument(skip(user))]
pub async fn me(OptionalAuth(user): OptionalAuth) -> axum::response::Response {
    match user {
        Some(user) => Json(SessionUser::from(&user)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Request a password reset email.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(form): Json<ForgotPasswordForm>,
) -> Result<Json<MessageResponse>> {
    state.backend().forgot_password(&form.email).await?;
    Ok(Json(MessageResponse {
        message: "If an account with that email exists, a password reset link has been sent."
            .to_owned(),
    }))
}

/// Complete a password reset with the emailed token.
#[instrument(skip(state, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(form): Json<ResetPasswordForm>,
) -> Result<Json<MessageResponse>> {
    state
        .backend()
        .reset_password(&form.token, &form.new_password)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully.".to_owned(),
    }))
}
