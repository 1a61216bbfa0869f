//! HTTP route handlers for the admin panel.
//!
//! All responses are JSON; the back-office UI is a separate client.
//! Every route except the auth routes requires a signed-in admin.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST /auth/login             - Login (requires role == "admin")
//! POST /auth/logout            - Logout
//! GET  /auth/me                - Current admin identity
//!
//! # Products
//! GET    /products             - Product listing
//! POST   /products             - Create product (multipart, image required)
//! GET    /products/{id}        - Product detail
//! PUT    /products/{id}        - Update product (multipart, image optional)
//! DELETE /products/{id}        - Delete product
//! POST   /products/{id}/add-stock - Add stock units
//!
//! # Categories
//! GET    /categories           - Category listing
//! POST   /categories           - Create category
//! PUT    /categories/{id}      - Update category
//! DELETE /categories/{id}      - Delete category
//!
//! # Orders
//! GET  /orders?show_archived=  - Order listing
//! GET  /orders/{uid}           - Order detail by reference
//! PUT  /orders/{id}            - Status transition
//!
//! # Customers
//! GET  /customers              - Customer listing
//!
//! # Contact
//! GET    /contact              - Contact submission listing
//! DELETE /contact/{id}         - Delete a submission
//! ```

pub mod auth;
pub mod categories;
pub mod contact;
pub mod customers;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_sessions::Session;

use crate::backend::AdminBackendError;
use crate::error::AppError;
use crate::middleware::clear_current_admin;
use crate::state::AppState;

/// Map a proxied backend result, flushing the admin session on 401.
///
/// The backend is the authority on token validity; once it says 401 the
/// stored session identity is useless and is dropped immediately.
pub(crate) async fn proxied<T>(
    session: &Session,
    result: Result<T, AdminBackendError>,
) -> Result<T, AppError> {
    if matches!(result, Err(AdminBackendError::Unauthorized)) {
        if let Err(e) = clear_current_admin(session).await {
            tracing::warn!(error = %e, "Failed to clear admin session after 401");
        }
    }
    result.map_err(AppError::from)
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Products
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/products/{id}/add-stock", post(products::add_stock))
        // Categories
        .route(
            "/categories",
            get(categories::index).post(categories::create),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::destroy),
        )
        // Orders (GET is addressed by uid, PUT by numeric id)
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show).put(orders::update))
        // Customers
        .route("/customers", get(customers::index))
        // Contact submissions
        .route("/contact", get(contact::index))
        .route("/contact/{id}", delete(contact::destroy))
}
