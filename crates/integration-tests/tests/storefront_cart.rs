//! Session cart flows: adding, stock refusals, quantity updates, clearing.

use rust_decimal::Decimal;
use serde_json::json;

use velvet_loom_integration_tests::{TestContext, as_decimal};

#[tokio::test]
async fn add_to_cart_updates_totals_and_count() {
    let ctx = TestContext::new().await;

    let body = ctx.cart_add(1).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Indigo Kurta added to cart!");
    assert_eq!(body["cart"]["item_count"], 1);

    // Second unit of the same product increments the line
    let body = ctx.cart_add(1).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cart"]["item_count"], 2);
    assert_eq!(body["cart"]["lines"][0]["qty"], 2);

    // price 100 x 2 = 200, flat shipping 50, 5% tax 10
    let totals = &body["cart"]["totals"];
    assert_eq!(as_decimal(&totals["subtotal"]), Decimal::new(200, 0));
    assert_eq!(as_decimal(&totals["shipping"]), Decimal::new(50, 0));
    assert_eq!(as_decimal(&totals["tax"]), Decimal::new(10, 0));
    assert_eq!(as_decimal(&totals["total"]), Decimal::new(260, 0));

    let count: serde_json::Value = ctx
        .client
        .get(format!("{}/cart/count", ctx.storefront_url))
        .send()
        .await
        .expect("count request failed")
        .json()
        .await
        .expect("count response not JSON");
    assert_eq!(count["count"], 2);
}

#[tokio::test]
async fn out_of_stock_product_is_refused() {
    let ctx = TestContext::new().await;

    let body = ctx.cart_add(2).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Sorry, this item is out of stock.");
    assert_eq!(body["cart"]["item_count"], 0);
}

#[tokio::test]
async fn adding_past_stock_is_refused_and_leaves_cart_unchanged() {
    let ctx = TestContext::new().await;

    // Product 1 has 3 units
    for _ in 0..3 {
        let body = ctx.cart_add(1).await;
        assert_eq!(body["status"], "ok");
    }

    let body = ctx.cart_add(1).await;
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "You cannot add more, only 3 units are available."
    );
    assert_eq!(body["cart"]["lines"][0]["qty"], 3);
}

#[tokio::test]
async fn update_quantity_past_stock_is_refused() {
    let ctx = TestContext::new().await;
    ctx.cart_add(1).await;

    let body: serde_json::Value = ctx
        .client
        .post(format!("{}/cart/update", ctx.storefront_url))
        .json(&json!({ "product_id": 1, "qty": 99 }))
        .send()
        .await
        .expect("update request failed")
        .json()
        .await
        .expect("update response not JSON");

    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Only 3 units are available.");
    assert_eq!(body["cart"]["lines"][0]["qty"], 1);
}

#[tokio::test]
async fn update_quantity_to_zero_removes_the_line() {
    let ctx = TestContext::new().await;
    ctx.cart_add(1).await;
    ctx.cart_add(3).await;

    let body: serde_json::Value = ctx
        .client
        .post(format!("{}/cart/update", ctx.storefront_url))
        .json(&json!({ "product_id": 1, "qty": 0 }))
        .send()
        .await
        .expect("update request failed")
        .json()
        .await
        .expect("update response not JSON");

    assert_eq!(body["status"], "ok");
    assert_eq!(body["cart"]["lines"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["cart"]["lines"][0]["product_id"], 3);
}

#[tokio::test]
async fn clear_empties_the_cart_and_zeroes_totals() {
    let ctx = TestContext::new().await;
    ctx.cart_add(1).await;
    ctx.cart_add(3).await;

    let body: serde_json::Value = ctx
        .client
        .post(format!("{}/cart/clear", ctx.storefront_url))
        .send()
        .await
        .expect("clear request failed")
        .json()
        .await
        .expect("clear response not JSON");

    assert_eq!(body["status"], "ok");
    assert_eq!(body["cart"]["item_count"], 0);
    let totals = &body["cart"]["totals"];
    assert_eq!(as_decimal(&totals["subtotal"]), Decimal::ZERO);
    // No shipping on an empty cart
    assert_eq!(as_decimal(&totals["shipping"]), Decimal::ZERO);
    assert_eq!(as_decimal(&totals["total"]), Decimal::ZERO);
}

#[tokio::test]
async fn unknown_product_yields_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .post(format!("{}/cart/add", ctx.storefront_url))
        .json(&json!({ "product_id": 999 }))
        .send()
        .await
        .expect("add request failed");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
