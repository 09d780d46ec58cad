//! Integration tests for the public catalog endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p bazaar-server)
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use bazaar_integration_tests::{base_url, client};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_product_listing_is_public() {
    let resp = client()
        .get(format!("{}/products", base_url()))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_product_search_and_filters() {
    let client = client();
    let base = base_url();

    for query in [
        "/products?search=shirt",
        "/products?brand=Seabreeze&color=white",
        "/products?min_price=10&max_price=100",
    ] {
        let resp = client
            .get(format!("{base}{query}"))
            .send()
            .await
            .expect("Failed to list products");
        assert_eq!(resp.status(), StatusCode::OK, "query {query} failed");
        let body: Value = resp.json().await.expect("Failed to parse response");
        assert!(body.is_array());
    }
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_trailing_slash_is_normalized() {
    let resp = client()
        .get(format!("{}/products/", base_url()))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_cors_preflight_mirrors_origin() {
    let resp = client()
        .request(reqwest::Method::OPTIONS, format!("{}/products", base_url()))
        .header("Origin", "https://storefront.example")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .expect("Failed to send preflight");

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://storefront.example")
    );
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_missing_product_is_404() {
    let resp = client()
        .get(format!("{}/products/999999999", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_catalog_mutation_requires_auth() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/products"))
        .json(&json!({
            "name": "Unauthorized Product",
            "price": "10.00",
            "stock": 1,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .post(format!("{base}/categories"))
        .json(&json!({ "name": "Unauthorized Category" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_category_listing_is_public() {
    let resp = client()
        .get(format!("{}/categories", base_url()))
        .send()
        .await
        .expect("Failed to list categories");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_reviews_of_missing_product_404() {
    let resp = client()
        .get(format!("{}/products/999999999/reviews", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
