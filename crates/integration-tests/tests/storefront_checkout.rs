//! Checkout flows: auth gating, order placement, and the 401 session reset.

use serde_json::{Value, json};

use velvet_loom_integration_tests::TestContext;

fn checkout_body() -> Value {
    json!({
        "customer_name": "Asha Rao",
        "customer_phone": "9000000000",
        "customer_address": "12 Loom Street, Chennai"
    })
}

#[tokio::test]
async fn checkout_requires_login() {
    let ctx = TestContext::new().await;
    ctx.cart_add(1).await;

    let response = ctx
        .client
        .post(format!("{}/checkout", ctx.storefront_url))
        .json(&checkout_body())
        .send()
        .await
        .expect("checkout request failed");

    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body not JSON");
    assert_eq!(body["redirect"], "/auth/login");
}

#[tokio::test]
async fn checkout_refuses_an_empty_cart() {
    let ctx = TestContext::new().await;
    let login = ctx.storefront_login("shopper@example.com", "pw").await;
    assert_eq!(login.status(), reqwest::StatusCode::OK);

    let response = ctx
        .client
        .post(format!("{}/checkout", ctx.storefront_url))
        .json(&checkout_body())
        .send()
        .await
        .expect("checkout request failed");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_refuses_missing_billing_fields() {
    let ctx = TestContext::new().await;
    ctx.storefront_login("shopper@example.com", "pw").await;
    ctx.cart_add(1).await;

    let response = ctx
        .client
        .post(format!("{}/checkout", ctx.storefront_url))
        .json(&json!({
            "customer_name": "Asha Rao",
            "customer_phone": "  ",
            "customer_address": "12 Loom Street"
        }))
        .send()
        .await
        .expect("checkout request failed");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn successful_checkout_submits_cart_and_clears_it() {
    let ctx = TestContext::new().await;
    ctx.storefront_login("shopper@example.com", "pw").await;
    ctx.cart_add(1).await;
    ctx.cart_add(1).await;

    let response = ctx
        .client
        .post(format!("{}/checkout", ctx.storefront_url))
        .json(&checkout_body())
        .send()
        .await
        .expect("checkout request failed");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.expect("checkout response not JSON");
    assert_eq!(body["order_uid"], "ORD-20260830-3FA2B1");

    // The backend saw the session cart, not some other state
    let requests = ctx.backend.checkout_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["user_id"], 1);
    assert_eq!(requests[0]["items"][0]["product_id"], 1);
    assert_eq!(requests[0]["items"][0]["qty"], 2);
    assert_eq!(requests[0]["customer_name"], "Asha Rao");

    // Cart is gone after a placed order
    let cart: Value = ctx
        .client
        .get(format!("{}/cart", ctx.storefront_url))
        .send()
        .await
        .expect("cart request failed")
        .json()
        .await
        .expect("cart response not JSON");
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
async fn overlapping_checkouts_place_exactly_one_order() {
    let ctx = TestContext::new().await;
    ctx.storefront_login("shopper@example.com", "pw").await;
    ctx.cart_add(1).await;

    // Slow backend so the second submission lands while the first is
    // still in flight.
    ctx.backend
        .set_checkout_delay(std::time::Duration::from_millis(500));

    let first_client = ctx.client.clone();
    let first_url = ctx.storefront_url.clone();
    let first = tokio::spawn(async move {
        first_client
            .post(format!("{first_url}/checkout"))
            .json(&checkout_body())
            .send()
            .await
            .expect("first checkout request failed")
    });

    // Give the first request time to reach the storefront
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let second = ctx
        .client
        .post(format!("{}/checkout", ctx.storefront_url))
        .json(&checkout_body())
        .send()
        .await
        .expect("second checkout request failed");
    assert_eq!(second.status(), reqwest::StatusCode::BAD_REQUEST);
    let refusal: Value = second.json().await.expect("refusal body not JSON");
    assert!(
        refusal["detail"]
            .as_str()
            .is_some_and(|detail| detail.contains("already being placed")),
        "unexpected refusal: {refusal}"
    );

    let first = first.await.expect("first checkout task panicked");
    assert_eq!(first.status(), reqwest::StatusCode::OK);

    // Only the winning submission reached the backend
    assert_eq!(ctx.backend.checkout_requests().len(), 1);
}

#[tokio::test]
async fn stale_token_resets_the_session() {
    let ctx = TestContext::new().await;
    // tok-stale logs in fine but is rejected on every later backend call
    ctx.storefront_login("stale@example.com", "pw").await;
    ctx.cart_add(1).await;

    let response = ctx
        .client
        .post(format!("{}/checkout", ctx.storefront_url))
        .json(&checkout_body())
        .send()
        .await
        .expect("checkout request failed");
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body not JSON");
    assert_eq!(body["redirect"], "/auth/login");

    // Identity was flushed; the client is anonymous again
    let me = ctx
        .client
        .get(format!("{}/auth/me", ctx.storefront_url))
        .send()
        .await
        .expect("me request failed");
    assert_eq!(me.status(), reqwest::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let ctx = TestContext::new().await;
    let response = ctx.storefront_login("shopper@example.com", "wrong").await;
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}
