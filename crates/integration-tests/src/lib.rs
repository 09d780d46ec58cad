//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! # Run migrations and start the server
//! cargo run -p bazaar-cli -- migrate
//! cargo run -p bazaar-server
//!
//! # Run integration tests against it
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a live server over HTTP; the base URL defaults to
//! `http://localhost:3000` and is configurable via `BAZAAR_BASE_URL`.
//!
//! Tests that complete a login read the emailed two-factor code back out of
//! a [mailpit](https://mailpit.axllent.org) instance, whose API defaults to
//! `http://localhost:8025` and is configurable via `BAZAAR_MAILPIT_URL`.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAZAAR_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the mailpit API holding the server's outbound mail.
#[must_use]
pub fn mailpit_url() -> String {
    std::env::var("BAZAAR_MAILPIT_URL").unwrap_or_else(|_| "http://localhost:8025".to_string())
}

/// Build a client with a cookie store so session cookies persist.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a throwaway user and return the registration payload used.
///
/// Usernames, emails, and mobile numbers are randomized so tests don't
/// collide with earlier runs against the same database.
pub async fn register_random_user(client: &Client) -> Value {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let short: String = suffix.chars().take(10).collect();
    let digits: String = suffix
        .bytes()
        .take(7)
        .map(|b| char::from(b'0' + (b % 10)))
        .collect();

    let payload = json!({
        "username": format!("user_{short}"),
        "email": format!("{short}@example.test"),
        "mobile_number": format!("+1555{digits}"),
        "password": "integration-pass-1",
    });

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to register user");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    payload
}

/// Fetch the text body of the newest message mailpit holds for `to`.
///
/// Polls briefly because SMTP delivery lands after the HTTP response that
/// triggered it.
pub async fn latest_email_text(client: &Client, to: &str) -> String {
    let mailpit = mailpit_url();

    for _ in 0..20 {
        let search: Value = client
            .get(format!("{mailpit}/api/v1/search"))
            .query(&[("query", format!("to:{to}"))])
            .send()
            .await
            .expect("Failed to query mailpit")
            .json()
            .await
            .expect("Failed to parse mailpit search response");

        if let Some(id) = search["messages"][0]["ID"].as_str() {
            let message: Value = client
                .get(format!("{mailpit}/api/v1/message/{id}"))
                .send()
                .await
                .expect("Failed to fetch message from mailpit")
                .json()
                .await
                .expect("Failed to parse mailpit message");

            return message["Text"]
                .as_str()
                .expect("Message has no text body")
                .to_string();
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    panic!("No email for {to} arrived in mailpit");
}

/// Pull the six-digit verification code out of a login email body.
#[must_use]
pub fn extract_code(body: &str) -> String {
    body.split(|c: char| !c.is_ascii_digit())
        .find(|part| part.len() == 6)
        .expect("No six-digit code in email")
        .to_string()
}

/// Pull the reset token out of a password-reset email body.
#[must_use]
pub fn extract_reset_token(body: &str) -> String {
    let (_, rest) = body.split_once("token=").expect("No token link in email");
    rest.chars().take(36).collect()
}

/// Register a fresh user and complete both login factors.
///
/// Needs mailpit capturing the server's outbound mail so the emailed code
/// can be read back. Returns the registration payload.
pub async fn register_and_log_in(client: &Client) -> Value {
    let payload = register_random_user(client).await;

    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({
            "username": payload["username"],
            "password": payload["password"],
        }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let email = payload["email"].as_str().expect("registration email");
    let code = extract_code(&latest_email_text(client, email).await);

    let resp = client
        .post(format!("{}/auth/two-factor/verify", base_url()))
        .json(&json!({ "code": code }))
        .send()
        .await
        .expect("Failed to verify login code");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    payload
}
