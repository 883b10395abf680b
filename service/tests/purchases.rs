//! Purchase initiation integration tests.
//!
//! Checkout-session creation against the real provider is exercised by the
//! client-side wiremock tests; here we cover the validation paths that never
//! leave the service.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn purchase_requires_a_configured_provider() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    let response = harness
        .server
        .post("/v1/purchase")
        .json(&json!({
            "account_id": "user_+4712345678",
            "coins": 50
        }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "upstream_unavailable");
}

#[tokio::test]
async fn purchase_rejects_unknown_bundle_sizes() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    let response = harness
        .server
        .post("/v1/purchase")
        .json(&json!({
            "account_id": "user_+4712345678",
            "coins": 42
        }))
        .await;
    response.assert_status_bad_request();
}
