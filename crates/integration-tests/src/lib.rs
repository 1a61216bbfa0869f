//! Integration test harness for Velvet Loom.
//!
//! Everything runs in-process: a mock backend REST API stands in for the
//! real inventory service, and the storefront and admin routers are served
//! on ephemeral ports. Tests drive them with a cookie-aware HTTP client,
//! exactly the way a browser client would.
//!
//! # Test accounts
//!
//! | Email                 | Password | Role     | Token       |
//! |-----------------------|----------|----------|-------------|
//! | `shopper@example.com` | `pw`     | customer | `tok-shopper` |
//! | `admin@example.com`   | `pw`     | admin    | `tok-admin`   |
//! | `stale@example.com`   | `pw`     | customer | `tok-stale`   |
//!
//! `tok-stale` is accepted at login but rejected with 401 on every later
//! call, simulating a token that expired mid-session.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};

/// Bearer tokens the mock backend accepts after login.
const VALID_TOKENS: &[&str] = &["tok-shopper", "tok-admin"];

/// Shared handle to everything a test needs.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
    pub admin_url: String,
    pub backend: MockBackend,
}

impl TestContext {
    /// Start the mock backend, the storefront, and the admin panel.
    ///
    /// # Panics
    ///
    /// Panics when a listener cannot be bound; tests cannot proceed then.
    pub async fn new() -> Self {
        let backend = MockBackend::default();
        let backend_url = spawn(backend.router()).await;

        let storefront_url = spawn(storefront_app(&backend_url)).await;
        let admin_url = spawn(admin_app(&backend_url)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url,
            admin_url,
            backend,
        }
    }

    /// Log in on the storefront with the given test account.
    pub async fn storefront_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/auth/login", self.storefront_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed")
    }

    /// Add a product to the session cart and return the parsed toast payload.
    pub async fn cart_add(&self, product_id: i32) -> Value {
        let response = self
            .client
            .post(format!("{}/cart/add", self.storefront_url))
            .json(&json!({ "product_id": product_id }))
            .send()
            .await
            .expect("cart add request failed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("cart add response not JSON")
    }
}

/// Read a JSON field as a `Decimal`, accepting both string and number
/// encodings.
///
/// # Panics
///
/// Panics when the value is neither a string nor a number; that is a test
/// failure, not a condition to recover from.
#[must_use]
pub fn as_decimal(value: &Value) -> rust_decimal::Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("expected a decimal, got {other}"),
    }
}

/// Serve a router on an ephemeral port, returning its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server died");
    });
    format!("http://{addr}")
}

/// Assemble the storefront router pointed at the mock backend.
fn storefront_app(backend_url: &str) -> Router {
    use velvet_loom_storefront::config::{BackendApiConfig, StorefrontConfig};
    use velvet_loom_storefront::middleware::create_session_layer;
    use velvet_loom_storefront::state::AppState;

    let config = StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        base_url: "http://localhost".to_owned(),
        session_secret: SecretString::from("kJ8#mP2$vQ9@nR4!xT7%wY3&zB6*cD1^fG5(hL0)"),
        backend: BackendApiConfig {
            base_url: backend_url.to_owned(),
        },
        google: None,
        sentry_dsn: None,
        sentry_environment: None,
    };
    let session_layer = create_session_layer(&config);
    let state = AppState::new(config);

    Router::new()
        .merge(velvet_loom_storefront::routes::routes())
        .layer(session_layer)
        .with_state(state)
}

/// Assemble the admin router pointed at the mock backend.
fn admin_app(backend_url: &str) -> Router {
    use velvet_loom_admin::config::{AdminConfig, BackendApiConfig};
    use velvet_loom_admin::middleware::create_session_layer;
    use velvet_loom_admin::state::AppState;

    let config = AdminConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        session_secret: SecretString::from("kJ8#mP2$vQ9@nR4!xT7%wY3&zB6*cD1^fG5(hL0)"),
        backend: BackendApiConfig {
            base_url: backend_url.to_owned(),
        },
        sentry_dsn: None,
        sentry_environment: None,
    };
    let session_layer = create_session_layer(&config);
    let state = AppState::new(config);

    Router::new()
        .merge(velvet_loom_admin::routes::routes())
        .layer(session_layer)
        .with_state(state)
}

// =============================================================================
// Mock backend
// =============================================================================

/// In-memory stand-in for the backend REST API.
///
/// Cloneable; clones share the recorded state so tests can inspect what
/// the servers under test actually sent.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Bodies received on `POST /api/checkout/`.
    checkout_requests: Vec<Value>,
    /// Artificial latency for `POST /api/checkout/`.
    checkout_delay: Option<std::time::Duration>,
}

impl MockBackend {
    /// Bodies received on the checkout endpoint so far.
    pub fn checkout_requests(&self) -> Vec<Value> {
        self.state
            .lock()
            .expect("mock state poisoned")
            .checkout_requests
            .clone()
    }

    /// Make the checkout endpoint respond slowly, so tests can overlap
    /// requests against it.
    pub fn set_checkout_delay(&self, delay: std::time::Duration) {
        self.state
            .lock()
            .expect("mock state poisoned")
            .checkout_delay = Some(delay);
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/api/products/", get(list_products))
            .route("/api/products/search", get(search_products))
            .route("/api/products/{id}", get(get_product))
            .route("/api/categories/", get(list_categories))
            .route("/api/auth/token", post(token))
            .route("/api/checkout/", post(checkout))
            .route("/api/users/", get(list_users))
            .with_state(self.clone())
    }
}

fn products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Indigo Kurta",
            "price": 100.0,
            "stock": 3,
            "description": "Hand-dyed indigo cotton kurta.",
            "image": "/static/images/products/indigo-kurta.jpg",
            "category_id": 1
        }),
        json!({
            "id": 2,
            "name": "Sold Out Stole",
            "price": 250.0,
            "stock": 0,
            "description": null,
            "image": "/static/images/products/stole.jpg",
            "category_id": 1
        }),
        json!({
            "id": 3,
            "name": "Linen Saree",
            "price": 1500.0,
            "stock": 10,
            "description": "Six yards of handloom linen.",
            "image": "/static/images/products/saree.jpg",
            "category_id": 2
        }),
    ]
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

async fn list_products() -> Json<Vec<Value>> {
    Json(products())
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
}

async fn search_products(Query(query): Query<SearchQuery>) -> Json<Vec<Value>> {
    let needle = query.query.to_lowercase();
    let hits = products()
        .into_iter()
        .filter(|p| {
            !needle.is_empty()
                && p["name"]
                    .as_str()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect();
    Json(hits)
}

async fn get_product(Path(id): Path<i64>) -> Response {
    match products().into_iter().find(|p| p["id"] == json!(id)) {
        Some(product) => Json(product).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Product not found" })),
        )
            .into_response(),
    }
}

async fn list_categories() -> Json<Vec<Value>> {
    Json(vec![
        json!({ "id": 1, "name": "Kurtas", "slug": "kurtas", "products": [] }),
        json!({ "id": 2, "name": "Sarees", "slug": "sarees", "products": [] }),
    ])
}

#[derive(Deserialize)]
struct TokenForm {
    username: String,
    password: String,
}

async fn token(axum::extract::Form(form): axum::extract::Form<TokenForm>) -> Response {
    if form.password != "pw" {
        return unauthorized();
    }
    let (token, user) = match form.username.as_str() {
        "shopper@example.com" => (
            "tok-shopper",
            json!({ "id": 1, "name": "Shopper", "email": "shopper@example.com", "is_active": 1, "role": "customer" }),
        ),
        "admin@example.com" => (
            "tok-admin",
            json!({ "id": 2, "name": "Admin", "email": "admin@example.com", "is_active": 1, "role": "admin" }),
        ),
        "stale@example.com" => (
            "tok-stale",
            json!({ "id": 3, "name": "Stale", "email": "stale@example.com", "is_active": 1, "role": "customer" }),
        ),
        _ => return unauthorized(),
    };
    Json(json!({ "access_token": token, "token_type": "bearer", "user": user })).into_response()
}

async fn checkout(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    if !VALID_TOKENS.contains(&token.as_str()) {
        return unauthorized();
    }

    let delay = backend
        .state
        .lock()
        .expect("mock state poisoned")
        .checkout_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    backend
        .state
        .lock()
        .expect("mock state poisoned")
        .checkout_requests
        .push(body);

    Json(json!({
        "order_uid": "ORD-20260830-3FA2B1",
        "total": 260.0,
        "status": "pending"
    }))
    .into_response()
}

async fn list_users(headers: HeaderMap) -> Response {
    match bearer_token(&headers).as_deref() {
        Some("tok-admin") => Json(vec![
            json!({ "id": 1, "name": "Shopper", "email": "shopper@example.com", "is_active": 1, "role": "customer" }),
            json!({ "id": 2, "name": "Admin", "email": "admin@example.com", "is_active": 1, "role": "admin" }),
        ])
        .into_response(),
        _ => unauthorized(),
    }
}
