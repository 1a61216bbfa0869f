//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use velvet_loom_core::{Product, ProductId};

use crate::error::Result;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: Option<String>,
}

/// Full product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.backend().list_products().await?;
    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = state.backend().get_product(ProductId::new(id)).await?;
    Ok(Json(product))
}

/// Product search. An empty query returns an empty result set, matching
/// the backend's behavior.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let Some(query) = params.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    else {
        return Ok(Json(Vec::new()));
    };

    let products = state.backend().search_products(query).await?;
    Ok(Json(products))
}
