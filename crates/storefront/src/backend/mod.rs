//! Backend REST API client.
//!
//! All durable state (inventory, orders, accounts) lives in the external
//! backend service; this client is the storefront's only way to reach it.
//! The backend is the source of truth - no local sync, direct API calls.
//!
//! Paths are consumed bit-exact (`/api/products/`, `/api/checkout/`, ...).
//! Authenticated calls carry a bearer token; a 401 response surfaces as
//! [`BackendError::Unauthorized`] so the caller can reset the session.
//!
//! # Example
//!
//! ```rust,ignore
//! use velvet_loom_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend);
//! let products = client.list_products().await?;
//! let receipt = client.checkout(&request, &token).await?;
//! ```

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use velvet_loom_core::{
    Category, CheckoutReceipt, CheckoutRequest, ContactSubmission, NewContactSubmission, Product,
    ProductId, User,
};

use crate::config::BackendApiConfig;

/// Errors that can occur when calling the backend REST API.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
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

/// Successful response of the backend token endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// Client for the backend REST API.
///
/// Cheaply cloneable; holds a shared `reqwest::Client`.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendApiConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
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
    ) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(extract_detail(&body)));
        }

        if status.is_client_error() {
            return Err(BackendError::Rejected {
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
            return Err(BackendError::Failure {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(BackendError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/products/"))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for unknown ids.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/api/products/{product_id}")))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Search products by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!(
                "/api/products/search?query={}",
                urlencoding::encode(query)
            )))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/categories/"))
            .send()
            .await?;
        Self::handle(response).await
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Submit an order.
    ///
    /// The backend re-validates stock; a refusal (out-of-stock item, bad
    /// user id) arrives as [`BackendError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected or the request fails.
    #[instrument(skip(self, request, token), fields(items = request.items.len()))]
    pub async fn checkout(
        &self,
        request: &CheckoutRequest,
        token: &str,
    ) -> Result<CheckoutReceipt, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/checkout/"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        Self::handle(response).await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// The token endpoint is OAuth2 password-grant shaped: form-encoded
    /// with `username`/`password` fields.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] for bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/auth/token"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the email is taken or the
    /// password fails backend validation.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Exchange a verified Google ID token for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] when Google token
    /// verification fails backend-side.
    #[instrument(skip(self, id_token))]
    pub async fn google_login(&self, id_token: &str) -> Result<TokenResponse, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/auth/google-login"))
            .json(&serde_json::json!({ "token": id_token }))
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Request a password reset email.
    ///
    /// Always succeeds backend-side regardless of whether the account
    /// exists (no account enumeration).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/auth/forgot-password"))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        let _: serde_json::Value = Self::handle(response).await?;
        Ok(())
    }

    /// Complete a password reset with the emailed token.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] for an invalid or expired token.
    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/auth/reset-password"))
            .json(&serde_json::json!({
                "token": token,
                "new_password": new_password,
            }))
            .send()
            .await?;
        let _: serde_json::Value = Self::handle(response).await?;
        Ok(())
    }

    // =========================================================================
    // Contact
    // =========================================================================

    /// Submit a contact form message.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, submission), fields(email = %submission.email))]
    pub async fn submit_contact(
        &self,
        submission: &NewContactSubmission,
    ) -> Result<ContactSubmission, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/contact/"))
            .json(submission)
            .send()
            .await?;
        Self::handle(response).await
    }
}

/// Pull the human-readable message out of a FastAPI-style error body.
///
/// The backend wraps errors as `{"detail": "..."}`; anything else falls
/// back to the (truncated) raw body.
fn extract_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(detail) = value.get("detail")
    {
        if let Some(s) = detail.as_str() {
            return s.to_owned();
        }
        return detail.to_string();
    }
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail": "Product not found"}"#),
            "Product not found"
        );
    }

    #[test]
    fn test_extract_detail_structured() {
        // FastAPI validation errors carry a list under "detail"
        let body = r#"{"detail": [{"loc": ["body", "qty"], "msg": "field required"}]}"#;
        assert!(extract_detail(body).contains("field required"));
    }

    #[test]
    fn test_extract_detail_fallback_truncates() {
        let body = "x".repeat(500);
        assert_eq!(extract_detail(&body).len(), 200);
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Rejected {
            status: 400,
            detail: "Could not create order".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Backend rejected request (400): Could not create order"
        );
    }
}
