//! Home route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use velvet_loom_core::Product;

use crate::error::Result;
use crate::state::AppState;

/// Number of products shown in the home carousel.
const FEATURED_COUNT: usize = 8;

/// Home page payload.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub featured: Vec<Product>,
}

/// Featured products for the landing page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>> {
    let mut products = state.backend().list_products().await?;
    products.truncate(FEATURED_COUNT);
    Ok(Json(HomeResponse { featured: products }))
}
