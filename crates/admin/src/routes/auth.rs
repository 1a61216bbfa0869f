//! Admin authentication routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use velvet_loom_core::Email;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Identity payload returned by login and `/auth/me`.
#[derive(Debug, Serialize)]
pub struct AdminView {
    pub id: i32,
    pub name: String,
    pub email: Email,
}

impl From<&CurrentAdmin> for AdminView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            id: admin.id.as_i32(),
            name: admin.name.clone(),
            email: admin.email.clone(),
        }
    }
}

/// POST /auth/login
///
/// Exchanges credentials at the backend token endpoint and stores the
/// admin in the session. Users without the admin role are rejected even
/// when their credentials are valid; the token is discarded unused.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<AdminView>> {
    let token = state
        .backend()
        .login(&form.email, &form.password)
        .await
        .map_err(|_| AppError::Unauthorized("Invalid email or password.".to_owned()))?;

    if !token.user.is_admin() {
        tracing::warn!(user_id = %token.user.id, "Non-admin login attempt on admin panel");
        return Err(AppError::Unauthorized(
            "This account does not have admin access.".to_owned(),
        ));
    }

    let admin = CurrentAdmin::from_user(&token.user, token.access_token);
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store session: {e}")))?;

    tracing::info!(admin_id = %admin.id, "Admin logged in");
    Ok(Json(AdminView::from(&admin)))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to clear session: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<AdminView> {
    Json(AdminView::from(&admin))
}
