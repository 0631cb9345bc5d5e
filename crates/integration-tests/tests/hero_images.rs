//! Integration tests for the hero carousel API.
//!
//! Run with: cargo test -p dopetech-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use dopetech_integration_tests::{base_url, session_client};

async fn create_slide(client: &reqwest::Client, title: &str, display_order: i32) -> i64 {
    let resp = client
        .post(format!("{}/api/hero-images", base_url()))
        .json(&json!({
            "title": title,
            "subtitle": "integration test",
            "description": "",
            "image_url": "/files/hero/test.jpg",
            "display_order": display_order
        }))
        .send()
        .await
        .expect("Failed to create hero slide");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse slide");
    body["id"].as_i64().expect("slide id")
}

async fn delete_slide(client: &reqwest::Client, id: i64) {
    let _ = client
        .delete(format!("{}/api/hero-images/{id}", base_url()))
        .send()
        .await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_slides_listed_in_display_order() {
    let client = session_client();

    let second = create_slide(&client, "IT Slide B", 20).await;
    let first = create_slide(&client, "IT Slide A", 10).await;

    let resp = client
        .get(format!("{}/api/hero-images", base_url()))
        .send()
        .await
        .expect("Failed to list slides");
    assert_eq!(resp.status(), StatusCode::OK);

    let slides: Vec<Value> = resp.json().await.expect("Failed to parse slides");
    let pos_a = slides
        .iter()
        .position(|s| s["id"].as_i64() == Some(first))
        .expect("slide A listed");
    let pos_b = slides
        .iter()
        .position(|s| s["id"].as_i64() == Some(second))
        .expect("slide B listed");
    assert!(pos_a < pos_b);

    delete_slide(&client, first).await;
    delete_slide(&client, second).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_slide_update_is_visible_in_listing() {
    let client = session_client();
    let id = create_slide(&client, "IT Slide Update", 30).await;

    let resp = client
        .put(format!("{}/api/hero-images/{id}", base_url()))
        .json(&json!({
            "title": "IT Slide Updated",
            "subtitle": "integration test",
            "description": "",
            "image_url": "/files/hero/test.jpg",
            "show_content": false,
            "display_order": 30
        }))
        .send()
        .await
        .expect("Failed to update slide");
    assert_eq!(resp.status(), StatusCode::OK);

    // The listing cache is invalidated on mutation, so the update shows
    // up immediately
    let resp = client
        .get(format!("{}/api/hero-images", base_url()))
        .send()
        .await
        .expect("Failed to list slides");
    let slides: Vec<Value> = resp.json().await.expect("Failed to parse slides");
    let slide = slides
        .iter()
        .find(|s| s["id"].as_i64() == Some(id))
        .expect("updated slide listed");
    assert_eq!(slide["title"], "IT Slide Updated");
    assert_eq!(slide["show_content"], false);

    delete_slide(&client, id).await;
}
