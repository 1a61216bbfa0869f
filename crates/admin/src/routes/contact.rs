//! Contact submission routes.

use axum::{
    Json,
    extract::{Path, State},
};
use tower_sessions::Session;

use velvet_loom_core::{ContactSubmission, ContactSubmissionId};

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::routes::proxied;
use crate::state::AppState;

/// GET /contact
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Vec<ContactSubmission>>> {
    let submissions = state
        .backend()
        .list_contact_submissions(&admin.access_token)
        .await;
    Ok(Json(proxied(&session, submissions).await?))
}

/// DELETE /contact/{id}
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<ContactSubmission>> {
    let deleted = state
        .backend()
        .delete_contact_submission(ContactSubmissionId::new(id), &admin.access_token)
        .await;
    Ok(Json(proxied(&session, deleted).await?))
}
