//! Category route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use velvet_loom_core::Category;

use crate::error::Result;
use crate::state::AppState;

/// Category listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.backend().list_categories().await?;
    Ok(Json(categories))
}
