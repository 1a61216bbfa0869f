//! Customer listing route.

use axum::{Json, extract::State};
use tower_sessions::Session;

use velvet_loom_core::User;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::routes::proxied;
use crate::state::AppState;

/// GET /customers
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Vec<User>>> {
    let customers = state.backend().list_customers(&admin.access_token).await;
    Ok(Json(proxied(&session, customers).await?))
}
