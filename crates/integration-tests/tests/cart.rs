//! Integration tests for the session-backed cart.
//!
//! The cart rides in the session cookie, so every test uses one
//! cookie-holding client for its whole flow.
//!
//! Run with: cargo test -p dopetech-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use dopetech_integration_tests::{base_url, decimal, session_client};

/// Test helper: create a product to add to carts.
async fn create_test_product(client: &reqwest::Client, name: &str, price: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": name,
            "price": price,
            "category": "mouse",
            "color": "Red, Black"
        }))
        .send()
        .await
        .expect("Failed to create test product");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse product");
    body["id"].as_i64().expect("product id")
}

async fn delete_test_product(client: &reqwest::Client, id: i64) {
    let _ = client
        .delete(format!("{}/api/products/{id}", base_url()))
        .send()
        .await;
}

/// Test helper: add a product to the cart and return the cart summary.
async fn add_to_cart(client: &reqwest::Client, body: Value) -> Value {
    let resp = client
        .post(format!("{}/api/cart/add", base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse cart summary")
}

// ============================================================================
// Merge & Dedupe
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_same_variant_merges_into_one_line() {
    let client = session_client();
    let product_id = create_test_product(&client, "IT Cart Merge", "100").await;

    add_to_cart(&client, json!({ "product_id": product_id })).await;
    let cart = add_to_cart(&client, json!({ "product_id": product_id })).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["count"], 2);
    assert_eq!(decimal(&cart["total"]), 200.0);

    delete_test_product(&client, product_id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_different_color_creates_second_line() {
    let client = session_client();
    let product_id = create_test_product(&client, "IT Cart Variant", "100").await;

    add_to_cart(&client, json!({ "product_id": product_id })).await;
    add_to_cart(&client, json!({ "product_id": product_id })).await;
    let cart = add_to_cart(
        &client,
        json!({ "product_id": product_id, "selected_color": "Red" }),
    )
    .await;

    // One bare line at qty 2, one Red line at qty 1
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(cart["count"], 3);
    assert_eq!(decimal(&cart["total"]), 300.0);

    delete_test_product(&client, product_id).await;
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_update_quantity_and_zero_removes() {
    let client = session_client();
    let product_id = create_test_product(&client, "IT Cart Qty", "50").await;

    add_to_cart(&client, json!({ "product_id": product_id })).await;

    let resp = client
        .post(format!("{}/api/cart/update", base_url()))
        .json(&json!({ "product_id": product_id, "quantity": 5 }))
        .send()
        .await
        .expect("Failed to update quantity");
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart["items"][0]["quantity"], 5);
    assert_eq!(decimal(&cart["total"]), 250.0);

    let resp = client
        .post(format!("{}/api/cart/update", base_url()))
        .json(&json!({ "product_id": product_id, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to zero quantity");
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(cart["count"], 0);

    delete_test_product(&client, product_id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_remove_drops_all_variants() {
    let client = session_client();
    let product_id = create_test_product(&client, "IT Cart Remove", "75").await;

    add_to_cart(&client, json!({ "product_id": product_id })).await;
    add_to_cart(
        &client,
        json!({ "product_id": product_id, "selected_color": "Black" }),
    )
    .await;

    let resp = client
        .post(format!("{}/api/cart/remove", base_url()))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to remove product");
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));

    delete_test_product(&client, product_id).await;
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_cart_survives_across_requests() {
    let client = session_client();
    let product_id = create_test_product(&client, "IT Cart Persist", "120").await;

    add_to_cart(&client, json!({ "product_id": product_id, "quantity": 3 })).await;

    // Fresh GET on the same session sees the same cart
    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("Failed to fetch cart");
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart["count"], 3);

    let resp = client
        .get(format!("{}/api/cart/count", base_url()))
        .send()
        .await
        .expect("Failed to fetch count");
    let count: Value = resp.json().await.expect("Failed to parse count");
    assert_eq!(count["count"], 3);

    delete_test_product(&client, product_id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_adding_unknown_product_is_rejected() {
    let client = session_client();

    let resp = client
        .post(format!("{}/api/cart/add", base_url()))
        .json(&json!({ "product_id": 999999999 }))
        .send()
        .await
        .expect("Failed to reach cart add");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
