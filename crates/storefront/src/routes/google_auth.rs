//! Google OAuth route handlers.
//!
//! Runs the authorization-code flow:
//! - Login: generates state and nonce, redirects to Google's consent page
//! - Callback: validates state, exchanges the code for an ID token,
//!   checks the token's nonce against the session, and hands the token to
//!   the backend's google-login endpoint for the usual bearer token

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::set_current_user;
use crate::models::{CurrentUser, session_keys};
use crate::services::id_token_nonce;
use crate::state::AppState;

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            char::from(*CHARSET.get(idx).unwrap_or(&b'a'))
        })
        .collect()
}

/// Initiate Google OAuth login.
///
/// # Route
///
/// `GET /auth/google`
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let Some(google) = state.google() else {
        return Redirect::to("/auth/login?error=google_disabled").into_response();
    };

    // Generate CSRF state and OpenID nonce
    let oauth_state = generate_random_string(32);
    let nonce = generate_random_string(32);

    // Store in session for validation on callback
    if let Err(e) = session
        .insert(session_keys::GOOGLE_OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }

    if let Err(e) = session
        .insert(session_keys::GOOGLE_OAUTH_NONCE, &nonce)
        .await
    {
        tracing::error!("Failed to store OAuth nonce in session: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }

    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);
    let auth_url = google.authorization_url(&redirect_uri, &oauth_state, &nonce);

    Redirect::to(&auth_url).into_response()
}

/// Handle the Google OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code for an
/// ID token, checks the token's nonce, verifies it backend-side, and
/// stores the resulting identity in the session.
///
/// # Route
///
/// `GET /auth/google/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(google) = state.google() else {
        return Redirect::to("/auth/login?error=google_disabled").into_response();
    };

    // Check for OAuth errors from Google
    if let Some(error) = query.error {
        tracing::warn!("Google OAuth error: {}", error);
        return Redirect::to("/auth/login?error=google_denied").into_response();
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("Google OAuth callback missing code");
        return Redirect::to("/auth/login?error=missing_code").into_response();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("Google OAuth callback missing state");
        return Redirect::to("/auth/login?error=missing_state").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::GOOGLE_OAUTH_STATE)
        .await
        .ok()
        .flatten();
    let stored_nonce: Option<String> = session
        .get(session_keys::GOOGLE_OAUTH_NONCE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Google OAuth state mismatch");
        return Redirect::to("/auth/login?error=invalid_state").into_response();
    }

    // State and nonce are single use
    let _ = session
        .remove::<String>(session_keys::GOOGLE_OAUTH_STATE)
        .await;
    let _ = session
        .remove::<String>(session_keys::GOOGLE_OAUTH_NONCE)
        .await;

    let Some(stored_nonce) = stored_nonce else {
        tracing::warn!("Google OAuth callback without a stored nonce");
        return Redirect::to("/auth/login?error=invalid_nonce").into_response();
    };

    // Build redirect URI (must match the one used in authorization request)
    let redirect_uri = format!("{}/auth/google/callback", state.config().base_url);

    // Exchange code for an ID token
    let id_token = match google.exchange_code(&code, &redirect_uri).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange Google OAuth code: {}", e);
            return Redirect::to("/auth/login?error=token_exchange").into_response();
        }
    };

    // The ID token must carry the nonce minted when this flow started;
    // anything else is a replayed or foreign token.
    if id_token_nonce(&id_token).as_deref() != Some(stored_nonce.as_str()) {
        tracing::warn!("Google OAuth nonce mismatch");
        return Redirect::to("/auth/login?error=invalid_nonce").into_response();
    }

    // Verify backend-side and get a bearer token
    let token = match state.backend().google_login(&id_token).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Backend rejected Google login: {}", e);
            return Redirect::to("/auth/login?error=google_rejected").into_response();
        }
    };

    let user = CurrentUser::from_user(token.user, token.access_token);
    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to store user in session: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }

    tracing::info!(user_id = %user.id, "Google login completed");

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_string_length_and_charset() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_random_string_not_constant() {
        assert_ne!(generate_random_string(32), generate_random_string(32));
    }
}
