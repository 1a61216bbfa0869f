//! Product management routes.
//!
//! Create and update accept multipart form data because the product image
//! travels with the other fields; the whole form is re-streamed to the
//! backend as-is. The admin panel never stores images itself.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;

use velvet_loom_core::{Product, ProductId};

use crate::backend::{ImageUpload, ProductForm};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::routes::proxied;
use crate::state::AppState;

/// GET /products
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Vec<Product>>> {
    let products = state.backend().list_products(&admin.access_token).await;
    Ok(Json(proxied(&session, products).await?))
}

/// GET /products/{id}
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = state
        .backend()
        .get_product(ProductId::new(id), &admin.access_token)
        .await;
    Ok(Json(proxied(&session, product).await?))
}

/// POST /products
///
/// Multipart create; the image part is mandatory.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let (form, image) = read_product_form(multipart).await?;
    let image = image.ok_or_else(|| {
        AppError::BadRequest("A product image is required.".to_owned())
    })?;

    let created = state
        .backend()
        .create_product(&form, image, &admin.access_token)
        .await;
    let created = proxied(&session, created).await?;

    tracing::info!(product_id = %created.id, name = %created.name, "Product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /products/{id}
///
/// Multipart update; omitting the image keeps the existing one.
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let (form, image) = read_product_form(multipart).await?;

    let updated = state
        .backend()
        .update_product(ProductId::new(id), &form, image, &admin.access_token)
        .await;
    Ok(Json(proxied(&session, updated).await?))
}

#[derive(Debug, Deserialize)]
pub struct AddStockBody {
    pub amount: i32,
}

/// POST /products/{id}/add-stock
pub async fn add_stock(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<AddStockBody>,
) -> Result<Json<Product>> {
    if body.amount <= 0 {
        return Err(AppError::BadRequest(
            "Stock amount must be a positive number.".to_owned(),
        ));
    }

    let updated = state
        .backend()
        .add_stock(ProductId::new(id), body.amount, &admin.access_token)
        .await;
    Ok(Json(proxied(&session, updated).await?))
}

/// DELETE /products/{id}
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let deleted = state
        .backend()
        .delete_product(ProductId::new(id), &admin.access_token)
        .await;
    let deleted = proxied(&session, deleted).await?;

    tracing::info!(product_id = %deleted.id, "Product deleted");
    Ok(Json(deleted))
}

/// Collect the product fields and the optional image from a multipart body.
async fn read_product_form(
    mut multipart: Multipart,
) -> Result<(ProductForm, Option<ImageUpload>)> {
    let mut name = None;
    let mut price = None;
    let mut stock = None;
    let mut description = None;
    let mut category_id = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(field_name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        if field_name == "image" {
            let file_name = field
                .file_name()
                .map_or_else(|| "upload".to_owned(), ToOwned::to_owned);
            let content_type = field
                .content_type()
                .map_or_else(|| "application/octet-stream".to_owned(), ToOwned::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read image: {e}")))?;
            // An empty file part means "no new image" on update forms
            if !bytes.is_empty() {
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed field '{field_name}': {e}")))?;
        match field_name.as_str() {
            "name" => name = Some(value),
            "price" => price = Some(value),
            "stock" => stock = Some(value),
            "description" => description = Some(value),
            "category_id" => category_id = Some(value),
            other => {
                tracing::debug!(field = other, "Ignoring unknown product form field");
            }
        }
    }

    let form = ProductForm {
        name: required_field(name, "name")?,
        price: required_field(price, "price")?,
        stock: required_field(stock, "stock")?,
        description,
        category_id: required_field(category_id, "category_id")?,
    };
    Ok((form, image))
}

fn required_field(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required field '{name}'.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_rejects_missing_and_blank() {
        assert!(required_field(None, "name").is_err());
        assert!(required_field(Some("  ".to_owned()), "name").is_err());
        assert_eq!(
            required_field(Some("Linen Kurta".to_owned()), "name").unwrap(),
            "Linen Kurta"
        );
    }
}
