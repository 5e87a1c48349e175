//! Contract tests for the admin surface.
//!
//! These tests require a running server and a migrated database. The login
//! tests additionally need an admin user created via:
//!
//! ```bash
//! afl-cli admin create -e $AFL_TEST_ADMIN_EMAIL -n "Test Admin" -p $AFL_TEST_ADMIN_PASSWORD
//! ```
//!
//! Run with: cargo test -p advice-for-life-integration-tests -- --ignored

use advice_for_life_integration_tests::{base_url, client};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn admin_credentials() -> Option<(String, String)> {
    let email = std::env::var("AFL_TEST_ADMIN_EMAIL").ok()?;
    let password = std::env::var("AFL_TEST_ADMIN_PASSWORD").ok()?;
    Some((email, password))
}

// ============================================================================
// Unauthenticated admin mutations are rejected
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_business_create_requires_auth() {
    let resp = client()
        .post(format!("{}/api/businesses", base_url()))
        .json(&json!({
            "name": "Unauthorized Venture",
            "description": "Should never be created.",
            "launchDate": "2024-01-01"
        }))
        .send()
        .await
        .expect("create");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_idea_list_requires_auth() {
    let resp = client()
        .get(format!("{}/api/business-ideas", base_url()))
        .send()
        .await
        .expect("list");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_pod_packages_requires_auth() {
    let resp = client()
        .get(format!("{}/api/admin/print/packages", base_url()))
        .send()
        .await
        .expect("packages");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_login_rejects_bad_credentials() {
    let resp = client()
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({"email": "nobody@example.com", "password": "wrong-password"}))
        .send()
        .await
        .expect("login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and seeded admin"]
async fn test_admin_session_business_crud() {
    let Some((email, password)) = admin_credentials() else {
        // No admin credentials in the environment; nothing to test.
        return;
    };

    let base = base_url();
    let client = client();

    // Login establishes the session cookie
    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("login");
    assert_eq!(resp.status(), StatusCode::OK);

    // Create
    let resp = client
        .post(format!("{base}/api/businesses"))
        .json(&json!({
            "name": format!("Contract Venture {}", std::process::id()),
            "description": "Created by the admin contract test.",
            "launchDate": "2024-06-01",
            "category": "Testing"
        }))
        .send()
        .await
        .expect("create");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("json body");
    let id = body["business"]["id"].as_str().expect("business id").to_owned();

    // Update
    let resp = client
        .patch(format!("{base}/api/businesses/{id}"))
        .json(&json!({"milestone": "Contract test passed", "status": "paused"}))
        .send()
        .await
        .expect("update");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["business"]["status"], "paused");

    // Delete
    let resp = client
        .delete(format!("{base}/api/businesses/{id}"))
        .send()
        .await
        .expect("delete");
    assert_eq!(resp.status(), StatusCode::OK);

    // Logout ends the session
    let resp = client
        .post(format!("{base}/auth/logout"))
        .send()
        .await
        .expect("logout");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base}/api/businesses"))
        .json(&json!({
            "name": "After logout",
            "description": "Should be rejected.",
            "launchDate": "2024-06-01"
        }))
        .send()
        .await
        .expect("create after logout");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
