//! Integration tests for the product catalog API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p dopetech-storefront)
//!
//! Run with: cargo test -p dopetech-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use dopetech_integration_tests::{base_url, decimal, session_client};

/// Test helper: create a product and return its JSON body.
async fn create_test_product(client: &reqwest::Client, name: &str) -> Value {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": name,
            "price": "2500",
            "category": "keyboard",
            "description": "integration test product",
            "features": ["RGB", "Hot-swap"],
            "color": "Black, White"
        }))
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product body")
}

/// Test helper: delete a product, ignoring failures.
async fn delete_test_product(client: &reqwest::Client, id: i64) {
    let _ = client
        .delete(format!("{}/api/products/{id}", base_url()))
        .send()
        .await;
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_health_endpoints() {
    let client = session_client();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Catalog CRUD
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_product_create_and_fetch() {
    let client = session_client();

    let product = create_test_product(&client, "IT Create Fetch").await;
    let id = product["id"].as_i64().expect("product id");

    // original_price defaults to price when absent
    assert_eq!(decimal(&product["price"]), 2500.0);
    assert_eq!(decimal(&product["original_price"]), 2500.0);
    assert_eq!(product["in_stock"], true);

    let resp = client
        .get(format!("{}/api/products/{id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK);

    let fetched: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(fetched["name"], "IT Create Fetch");
    assert_eq!(fetched["features"], json!(["RGB", "Hot-swap"]));

    delete_test_product(&client, id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_product_list_filters_by_category() {
    let client = session_client();

    let product = create_test_product(&client, "IT Category Filter").await;
    let id = product["id"].as_i64().expect("product id");

    let resp = client
        .get(format!("{}/api/products?category=keyboard", base_url()))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse list");
    assert!(products.iter().any(|p| p["id"].as_i64() == Some(id)));
    assert!(products.iter().all(|p| p["category"] == "keyboard"));

    delete_test_product(&client, id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_product_update_preserves_unsent_fields() {
    let client = session_client();

    let product = create_test_product(&client, "IT Partial Update").await;
    let id = product["id"].as_i64().expect("product id");

    let resp = client
        .patch(format!("{}/api/products/{id}", base_url()))
        .json(&json!({ "price": "1999" }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(decimal(&updated["price"]), 1999.0);
    // Fields omitted from the patch stay put
    assert_eq!(updated["name"], "IT Partial Update");
    assert_eq!(updated["color"], "Black, White");

    delete_test_product(&client, id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_product_delete_then_404() {
    let client = session_client();

    let product = create_test_product(&client, "IT Delete").await;
    let id = product["id"].as_i64().expect("product id");

    let resp = client
        .delete(format!("{}/api/products/{id}", base_url()))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/api/products/{id}", base_url()))
        .send()
        .await
        .expect("Failed to fetch deleted product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_unknown_product_returns_error_shape() {
    let client = session_client();

    let resp = client
        .get(format!("{}/api/products/999999999", base_url()))
        .send()
        .await
        .expect("Failed to fetch missing product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["error"].is_string());
}
