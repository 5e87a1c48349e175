//! Contract tests for the public API surface.
//!
//! These tests require a running server and a migrated database.
//! Run with: cargo test -p advice-for-life-integration-tests -- --ignored

use advice_for_life_integration_tests::{base_url, client};
use reqwest::StatusCode;
use serde_json::{Value, json};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health_endpoints() {
    let base = base_url();
    let client = client();

    let resp = client.get(format!("{base}/health")).send().await.expect("health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .expect("readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_checkout_rejects_unknown_product() {
    let resp = client()
        .post(format!("{}/api/checkout", base_url()))
        .json(&json!({"productType": "vinyl"}))
        .send()
        .await
        .expect("checkout");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["error"], "Invalid product type");
}

// ============================================================================
// Webhook
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_webhook_rejects_missing_signature() {
    let resp = client()
        .post(format!("{}/api/webhook", base_url()))
        .body(r#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{}}}"#)
        .send()
        .await
        .expect("webhook");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Downloads
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_download_requires_token() {
    let resp = client()
        .get(format!("{}/api/download", base_url()))
        .send()
        .await
        .expect("download");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_download_unknown_token_is_404() {
    let resp = client()
        .get(format!("{}/api/download?token=does-not-exist", base_url()))
        .send()
        .await
        .expect("download");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Order details
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_order_details_requires_session_id() {
    let resp = client()
        .get(format!("{}/api/order-details", base_url()))
        .send()
        .await
        .expect("order details");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Subscribe
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_subscribe_rejects_invalid_email() {
    let resp = client()
        .post(format!("{}/api/subscribe", base_url()))
        .json(&json!({"email": "not-an-email"}))
        .send()
        .await
        .expect("subscribe");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_subscribe_then_duplicate_is_rejected() {
    let base = base_url();
    let client = client();
    let email = format!("contract-test-{}@example.com", std::process::id());

    let resp = client
        .post(format!("{base}/api/subscribe"))
        .json(&json!({"email": email}))
        .send()
        .await
        .expect("subscribe");
    assert_eq!(resp.status(), StatusCode::OK);

    // Second subscription of the same address fails loudly
    let resp = client
        .post(format!("{base}/api/subscribe"))
        .json(&json!({"email": email}))
        .send()
        .await
        .expect("subscribe again");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Contact
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_contact_requires_fields() {
    let resp = client()
        .post(format!("{}/api/contact", base_url()))
        .json(&json!({"name": "Tester"}))
        .send()
        .await
        .expect("contact");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_contact_accepts_submission() {
    let resp = client()
        .post(format!("{}/api/contact", base_url()))
        .json(&json!({
            "name": "Tester",
            "email": "tester@example.com",
            "message": "Loved the book."
        }))
        .send()
        .await
        .expect("contact");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["success"], true);
}

// ============================================================================
// Businesses (public read)
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_business_list_shape() {
    let resp = client()
        .get(format!("{}/api/businesses", base_url()))
        .send()
        .await
        .expect("businesses");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("json body");
    assert!(body["businesses"].is_array());
    assert!(body["totalCount"].is_number());
    assert!(body["activeCount"].is_number());
}

// ============================================================================
// Business ideas (public surface)
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_idea_submission_requires_all_fields() {
    let resp = client()
        .post(format!("{}/api/business-ideas", base_url()))
        .json(&json!({"submitterName": "Tester", "submitterEmail": "t@example.com"}))
        .send()
        .await
        .expect("idea");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_idea_submission_and_public_count() {
    let base = base_url();
    let client = client();

    let before: Value = client
        .get(format!("{base}/api/business-ideas/count"))
        .send()
        .await
        .expect("count")
        .json()
        .await
        .expect("json body");

    let resp = client
        .post(format!("{base}/api/business-ideas"))
        .json(&json!({
            "submitterName": "Tester",
            "submitterEmail": "tester@example.com",
            "businessName": "Test Venture",
            "description": "A contract-test business.",
            "whyItMatters": "It proves the endpoint works."
        }))
        .send()
        .await
        .expect("idea");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let after: Value = client
        .get(format!("{base}/api/business-ideas/count"))
        .send()
        .await
        .expect("count")
        .json()
        .await
        .expect("json body");

    let before_count = before["totalCount"].as_i64().expect("before count");
    let after_count = after["totalCount"].as_i64().expect("after count");
    assert!(after_count > before_count);
}
