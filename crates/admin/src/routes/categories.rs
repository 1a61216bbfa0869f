//! Category management routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;

use velvet_loom_core::{Category, CategoryId};

use crate::backend::CategoryForm;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::routes::proxied;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
    pub slug: String,
}

impl CategoryBody {
    fn into_form(self) -> Result<CategoryForm> {
        let name = self.name.trim().to_owned();
        let slug = self.slug.trim().to_lowercase();
        if name.is_empty() || slug.is_empty() {
            return Err(AppError::BadRequest(
                "Category name and slug are required.".to_owned(),
            ));
        }
        Ok(CategoryForm { name, slug })
    }
}

/// GET /categories
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Vec<Category>>> {
    let categories = state.backend().list_categories(&admin.access_token).await;
    Ok(Json(proxied(&session, categories).await?))
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<Category>)> {
    let form = body.into_form()?;
    let created = state
        .backend()
        .create_category(&form, &admin.access_token)
        .await;
    let created = proxied(&session, created).await?;

    tracing::info!(category_id = %created.id, slug = %created.slug, "Category created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /categories/{id}
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<Category>> {
    let form = body.into_form()?;
    let updated = state
        .backend()
        .update_category(CategoryId::new(id), &form, &admin.access_token)
        .await;
    Ok(Json(proxied(&session, updated).await?))
}

/// DELETE /categories/{id}
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Category>> {
    let deleted = state
        .backend()
        .delete_category(CategoryId::new(id), &admin.access_token)
        .await;
    Ok(Json(proxied(&session, deleted).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_body_normalizes_slug() {
        let body = CategoryBody {
            name: " Sarees ".to_owned(),
            slug: " SAREES ".to_owned(),
        };
        let form = body.into_form().unwrap();
        assert_eq!(form.name, "Sarees");
        assert_eq!(form.slug, "sarees");
    }

    #[test]
    fn test_category_body_rejects_blank() {
        let body = CategoryBody {
            name: String::new(),
            slug: "sarees".to_owned(),
        };
        assert!(body.into_form().is_err());
    }
}
