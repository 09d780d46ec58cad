//! Integration tests for registration and the two-step login.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p bazaar-server)
//! - A mailpit instance capturing mail, for the tests that read codes
//!   and reset links back out of its API
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

use bazaar_integration_tests::{
    base_url, client, extract_reset_token, latest_email_text, register_and_log_in,
    register_random_user,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_register_duplicate_username_conflicts() {
    let client = client();
    let payload = register_random_user(&client).await;

    // Same username again, different email/mobile would still collide
    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_register_rejects_short_password() {
    let resp = client()
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({
            "username": "shortpass",
            "email": "shortpass@example.test",
            "mobile_number": "+15550000001",
            "password": "short",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and SMTP sink"]
async fn test_login_wrong_password_unauthorized() {
    let client = client();
    let payload = register_random_user(&client).await;

    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({
            "username": payload["username"],
            "password": "not-the-password",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and SMTP sink"]
async fn test_password_alone_does_not_log_in() {
    let client = client();
    let payload = register_random_user(&client).await;

    // First factor succeeds and emails a code
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({
            "username": payload["username"],
            "password": payload["password"],
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // But the session is still pending: protected routes reject it
    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // And a wrong code is rejected without logging in
    let resp = client
        .post(format!("{}/auth/two-factor/verify", base_url()))
        .json(&json!({ "code": "000000" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(
        resp.status() == StatusCode::NOT_FOUND,
        "wrong code should not be found, got {}",
        resp.status()
    );
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_verify_without_pending_login_unauthorized() {
    let resp = client()
        .post(format!("{}/auth/two-factor/verify", base_url()))
        .json(&json!({ "code": "123456" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and mailpit"]
async fn test_two_factor_login_grants_session() {
    let client = client();
    register_and_log_in(&client).await;

    // The emailed code promoted the session: protected routes now work
    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_password_reset_unknown_email() {
    let resp = client()
        .post(format!("{}/auth/password-reset", base_url()))
        .json(&json!({ "email": "nobody@example.test" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_password_reset_confirm_unknown_token() {
    let resp = client()
        .post(format!("{}/auth/password-reset/confirm", base_url()))
        .json(&json!({
            "token": uuid::Uuid::new_v4(),
            "new_password": "another-pass-1",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and mailpit"]
async fn test_reset_token_is_single_use() {
    let client = client();
    let payload = register_random_user(&client).await;
    let email = payload["email"].as_str().expect("registration email");

    let resp = client
        .post(format!("{}/auth/password-reset", base_url()))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let token = extract_reset_token(&latest_email_text(&client, email).await);
    let confirm = json!({ "token": token, "new_password": "replacement-pass-1" });

    let resp = client
        .post(format!("{}/auth/password-reset/confirm", base_url()))
        .json(&confirm)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    // The first redemption consumed the token
    let resp = client
        .post(format!("{}/auth/password-reset/confirm", base_url()))
        .json(&confirm)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // And the new password is the one that logs in
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({
            "username": payload["username"],
            "password": "replacement-pass-1",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);
}
