//! HTTP route handlers for the storefront.
//!
//! All responses are JSON; the visual layer is a separate client.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Featured products
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//! GET  /search?query=          - Product search
//! GET  /categories             - Category listing
//!
//! # Cart (session-backed)
//! GET  /cart                   - Cart contents and totals
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart badge count
//!
//! # Checkout
//! POST /checkout               - Place the order (requires login)
//!
//! # Auth
//! POST /auth/login             - Login (backend token endpoint)
//! POST /auth/register          - Register
//! POST /auth/logout            - Logout
//! GET  /auth/me                - Current session identity
//! POST /auth/forgot-password   - Request password reset email
//! POST /auth/reset-password    - Complete password reset
//!
//! # Google OAuth
//! GET  /auth/google            - Redirect to Google consent page
//! GET  /auth/google/callback   - Handle OAuth callback
//!
//! # Contact
//! POST /contact                - Submit contact form
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod contact;
pub mod google_auth;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        // Google OAuth
        .route("/google", get(google_auth::login))
        .route("/google/callback", get(google_auth::callback))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog routes
        .nest("/products", product_routes())
        .route("/search", get(products::search))
        .route("/categories", get(categories::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::place_order))
        // Auth routes
        .nest("/auth", auth_routes())
        // Contact form
        .route("/contact", post(contact::submit))
}
