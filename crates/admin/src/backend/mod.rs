//! Backend REST API client for back-office operations.
//!
//! Unlike the storefront client, every call here except `login` is a
//! privileged operation and carries the signed-in admin's bearer token.
//! Product create/update are multipart because the backend stores the
//! uploaded image alongside the form fields.
//!
//! A 401 from any call surfaces as [`AdminBackendError::Unauthorized`] so
//! the route layer can flush the session.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use velvet_loom_core::{
    Category, ContactSubmission, ContactSubmissionId, Order, OrderId, OrderUpdate, Product,
    ProductId, User,
};

use crate::config::BackendApiConfig;

/// Errors that can occur when calling the backend REST API.
#[derive(Debug, thiserror::Error)]
pub enum AdminBackendError {
    /// HTTP request failed (network, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The bearer token was missing, expired, or revoked.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the request (4xx with a detail message).
    #[error("Backend rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The backend returned a server error.
    #[error("Backend failure ({status}): {detail}")]
    Failure { status: u16, detail: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Successful response of the backend token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// Form fields of a product create or update.
///
/// Prices travel as plain decimal strings in the multipart body; the
/// backend parses them itself.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub description: Option<String>,
    pub category_id: String,
}

/// An uploaded product image, buffered in memory before forwarding.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// New or updated category fields.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CategoryForm {
    pub name: String,
    pub slug: String,
}

/// Client for the privileged backend endpoints.
///
/// Cheaply cloneable; holds a shared `reqwest::Client`.
#[derive(Clone)]
pub struct AdminBackendClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminBackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendApiConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Read a response body, mapping non-success statuses to errors.
    async fn handle<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AdminBackendError> {
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdminBackendError::Unauthorized);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AdminBackendError::NotFound(extract_detail(&body)));
        }

        if status.is_client_error() {
            return Err(AdminBackendError::Rejected {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend API returned non-success status"
            );
            return Err(AdminBackendError::Failure {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            AdminBackendError::Parse(e)
        })
    }

    fn multipart_form(form: &ProductForm, image: Option<ImageUpload>) -> reqwest::multipart::Form {
        let mut parts = reqwest::multipart::Form::new()
            .text("name", form.name.clone())
            .text("price", form.price.clone())
            .text("stock", form.stock.clone())
            .text("category_id", form.category_id.clone());
        if let Some(description) = &form.description {
            parts = parts.text("description", description.clone());
        }
        if let Some(image) = image {
            let part = reqwest::multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .unwrap_or_else(|_| {
                    reqwest::multipart::Part::bytes(Vec::new()).file_name("upload")
                });
            parts = parts.part("image", part);
        }
        parts
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// The token endpoint is form-encoded with `username`/`password` fields,
    /// regardless of the credential actually being an email address.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, AdminBackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/auth/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        Self::handle(response).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_products(&self, token: &str) -> Result<Vec<Product>, AdminBackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/products/"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(
        &self,
        id: ProductId,
        token: &str,
    ) -> Result<Product, AdminBackendError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/api/products/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Create a product. The image is required on create.
    #[instrument(skip(self, form, image))]
    pub async fn create_product(
        &self,
        form: &ProductForm,
        image: ImageUpload,
        token: &str,
    ) -> Result<Product, AdminBackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/products/"))
            .bearer_auth(token)
            .multipart(Self::multipart_form(form, Some(image)))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Update a product. Omitting the image keeps the existing one.
    #[instrument(skip(self, form, image))]
    pub async fn update_product(
        &self,
        id: ProductId,
        form: &ProductForm,
        image: Option<ImageUpload>,
        token: &str,
    ) -> Result<Product, AdminBackendError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/api/products/{id}")))
            .bearer_auth(token)
            .multipart(Self::multipart_form(form, image))
            .send()
            .await?;
        Self::handle(response).await
    }

    #[instrument(skip(self))]
    pub async fn add_stock(
        &self,
        id: ProductId,
        amount: i32,
        token: &str,
    ) -> Result<Product, AdminBackendError> {
        let response = self
            .inner
            .client
            .post(self.url(&format!("/api/products/{id}/add_stock")))
            .bearer_auth(token)
            .json(&serde_json::json!({ "amount": amount }))
            .send()
            .await?;
        Self::handle(response).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(
        &self,
        id: ProductId,
        token: &str,
    ) -> Result<Product, AdminBackendError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/api/products/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_categories(&self, token: &str) -> Result<Vec<Category>, AdminBackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/categories/"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    #[instrument(skip(self, form))]
    pub async fn create_category(
        &self,
        form: &CategoryForm,
        token: &str,
    ) -> Result<Category, AdminBackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/categories/"))
            .bearer_auth(token)
            .json(form)
            .send()
            .await?;
        Self::handle(response).await
    }

    #[instrument(skip(self, form))]
    pub async fn update_category(
        &self,
        id: velvet_loom_core::CategoryId,
        form: &CategoryForm,
        token: &str,
    ) -> Result<Category, AdminBackendError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/api/categories/{id}")))
            .bearer_auth(token)
            .json(form)
            .send()
            .await?;
        Self::handle(response).await
    }

    #[instrument(skip(self))]
    pub async fn delete_category(
        &self,
        id: velvet_loom_core::CategoryId,
        token: &str,
    ) -> Result<Category, AdminBackendError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/api/categories/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List all orders. `show_archived` switches between the active and the
    /// archived view.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        show_archived: bool,
        token: &str,
    ) -> Result<Vec<Order>, AdminBackendError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/api/orders/?show_archived={show_archived}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Fetch one order by its human-facing reference (`ORD-...`).
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_uid: &str, token: &str) -> Result<Order, AdminBackendError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/api/orders/{order_uid}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Transition an order's status. Addressed by numeric id, not uid.
    #[instrument(skip(self))]
    pub async fn update_order(
        &self,
        id: OrderId,
        update: OrderUpdate,
        token: &str,
    ) -> Result<Order, AdminBackendError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/api/orders/{id}")))
            .bearer_auth(token)
            .json(&update)
            .send()
            .await?;
        Self::handle(response).await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_customers(&self, token: &str) -> Result<Vec<User>, AdminBackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/users/"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    // =========================================================================
    // Contact submissions
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn list_contact_submissions(
        &self,
        token: &str,
    ) -> Result<Vec<ContactSubmission>, AdminBackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/contact/"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }

    #[instrument(skip(self))]
    pub async fn delete_contact_submission(
        &self,
        id: ContactSubmissionId,
        token: &str,
    ) -> Result<ContactSubmission, AdminBackendError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/api/contact/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Self::handle(response).await
    }
}

/// Extract the `detail` field from a FastAPI-style error body, falling back
/// to the raw body (truncated) when it is not JSON.
fn extract_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => match parsed.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        },
        Err(_) => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail": "Order not found"}"#),
            "Order not found"
        );
    }

    #[test]
    fn test_extract_detail_non_json() {
        assert_eq!(extract_detail("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_multipart_form_without_image_compiles() {
        let form = ProductForm {
            name: "Linen Kurta".to_owned(),
            price: "1299.00".to_owned(),
            stock: "10".to_owned(),
            description: None,
            category_id: "2".to_owned(),
        };
        // Form construction must not panic with or without an image part
        let _ = AdminBackendClient::multipart_form(&form, None);
        let _ = AdminBackendClient::multipart_form(
            &form,
            Some(ImageUpload {
                file_name: "kurta.jpg".to_owned(),
                content_type: "image/jpeg".to_owned(),
                bytes: vec![0xFF, 0xD8],
            }),
        );
    }
}
