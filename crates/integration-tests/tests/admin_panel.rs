//! Admin panel flows: role-gated login and proxied listings.

use serde_json::{Value, json};

use velvet_loom_integration_tests::TestContext;

async fn admin_login(ctx: &TestContext, email: &str, password: &str) -> reqwest::Response {
    ctx.client
        .post(format!("{}/auth/login", ctx.admin_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("admin login request failed")
}

#[tokio::test]
async fn admin_routes_require_login() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(format!("{}/customers", ctx.admin_url))
        .send()
        .await
        .expect("customers request failed");

    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body not JSON");
    assert_eq!(body["redirect"], "/auth/login");
}

#[tokio::test]
async fn customer_accounts_cannot_enter_the_admin_panel() {
    let ctx = TestContext::new().await;

    let response = admin_login(&ctx, "shopper@example.com", "pw").await;
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    // The rejected login must not have created a session
    let me = ctx
        .client
        .get(format!("{}/auth/me", ctx.admin_url))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(me.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_can_log_in_and_list_customers() {
    let ctx = TestContext::new().await;

    let response = admin_login(&ctx, "admin@example.com", "pw").await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let identity: Value = response.json().await.expect("login response not JSON");
    assert_eq!(identity["email"], "admin@example.com");

    let customers: Value = ctx
        .client
        .get(format!("{}/customers", ctx.admin_url))
        .send()
        .await
        .expect("customers request failed")
        .json()
        .await
        .expect("customers response not JSON");

    let customers = customers.as_array().expect("customer list");
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0]["email"], "shopper@example.com");
}

#[tokio::test]
async fn logout_drops_the_admin_session() {
    let ctx = TestContext::new().await;
    admin_login(&ctx, "admin@example.com", "pw").await;

    let logout = ctx
        .client
        .post(format!("{}/auth/logout", ctx.admin_url))
        .send()
        .await
        .expect("logout request failed");
    assert_eq!(logout.status(), reqwest::StatusCode::NO_CONTENT);

    let response = ctx
        .client
        .get(format!("{}/customers", ctx.admin_url))
        .send()
        .await
        .expect("customers request failed");
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}
