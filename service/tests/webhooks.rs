//! Payment webhook reconciliation integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;

#[tokio::test]
async fn signed_checkout_event_credits_the_bundle() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    let body = TestHarness::checkout_event("evt_1", "user_+4712345678", 99);
    let response = harness
        .server
        .post("/webhooks/payments")
        .add_header("stripe-signature", TestHarness::sign_webhook(&body))
        .text(body)
        .await;
    response.assert_status_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["received"], true);
    assert_eq!(json["outcome"], "applied");

    // 50-coin grant + 50-coin bundle.
    let response = harness.server.get("/v1/accounts/user_+4712345678").await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["balance"], 100);
}

#[tokio::test]
async fn replayed_event_is_skipped_not_recredited() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    let body = TestHarness::checkout_event("evt_1", "user_+4712345678", 199);

    for expected in ["applied", "skipped"] {
        let response = harness
            .server
            .post("/webhooks/payments")
            .add_header("stripe-signature", TestHarness::sign_webhook(&body))
            .text(body.clone())
            .await;
        response.assert_status_ok();

        let json: serde_json::Value = response.json();
        assert_eq!(json["outcome"], expected);
    }

    // Credited exactly once: 50 grant + 100 bundle.
    let response = harness.server.get("/v1/accounts/user_+4712345678").await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["balance"], 150);
}

#[tokio::test]
async fn distinct_events_credit_separately() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    for event_id in ["evt_1", "evt_2"] {
        let body = TestHarness::checkout_event(event_id, "user_+4712345678", 99);
        let response = harness
            .server
            .post("/webhooks/payments")
            .add_header("stripe-signature", TestHarness::sign_webhook(&body))
            .text(body)
            .await;
        response.assert_status_ok();
    }

    let response = harness.server.get("/v1/accounts/user_+4712345678").await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["balance"], 150);
}

#[tokio::test]
async fn bad_signature_is_rejected_and_nothing_credits() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    let body = TestHarness::checkout_event("evt_1", "user_+4712345678", 99);
    let response = harness
        .server
        .post("/webhooks/payments")
        .add_header("stripe-signature", "t=1700000000,v1=deadbeef")
        .text(body)
        .await;
    response.assert_status_bad_request();

    let json: serde_json::Value = response.json();
    assert_eq!(json["error"]["code"], "bad_signature");

    let response = harness.server.get("/v1/accounts/user_+4712345678").await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["balance"], 50);
}

#[tokio::test]
async fn missing_signature_is_rejected() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    let body = TestHarness::checkout_event("evt_1", "user_+4712345678", 99);
    let response = harness.server.post("/webhooks/payments").text(body).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn webhooks_are_rejected_without_a_configured_secret() {
    let harness = TestHarness::with_config(|config| config.payment_webhook_secret = None);
    harness.register("+4712345678").await;

    let body = TestHarness::checkout_event("evt_1", "user_+4712345678", 99);
    let response = harness
        .server
        .post("/webhooks/payments")
        .add_header("stripe-signature", TestHarness::sign_webhook(&body))
        .text(body)
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn unrecognized_amount_is_never_credited() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    let body = TestHarness::checkout_event("evt_1", "user_+4712345678", 250);
    let response = harness
        .server
        .post("/webhooks/payments")
        .add_header("stripe-signature", TestHarness::sign_webhook(&body))
        .text(body)
        .await;
    response.assert_status_bad_request();

    let response = harness.server.get("/v1/accounts/user_+4712345678").await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["balance"], 50);
}

#[tokio::test]
async fn unpaid_session_is_ignored() {
    let harness = TestHarness::new();
    harness.register("+4712345678").await;

    let body = serde_json::json!({
        "type": "checkout.session.completed",
        "id": "evt_1",
        "data": {
            "object": {
                "payment_status": "unpaid",
                "client_reference_id": "user_+4712345678",
                "amount_total": 99
            }
        }
    })
    .to_string();

    let response = harness
        .server
        .post("/webhooks/payments")
        .add_header("stripe-signature", TestHarness::sign_webhook(&body))
        .text(body)
        .await;
    response.assert_status_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["outcome"], "ignored");

    let response = harness.server.get("/v1/accounts/user_+4712345678").await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["balance"], 50);
}

#[tokio::test]
async fn unhandled_event_types_are_acknowledged() {
    let harness = TestHarness::new();

    let body = serde_json::json!({
        "type": "payment_intent.succeeded",
        "id": "evt_1",
        "data": { "object": {} }
    })
    .to_string();

    let response = harness
        .server
        .post("/webhooks/payments")
        .add_header("stripe-signature", TestHarness::sign_webhook(&body))
        .text(body)
        .await;
    response.assert_status_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["outcome"], "ignored");
}

#[tokio::test]
async fn event_for_unregistered_account_fails_without_marking() {
    let harness = TestHarness::new();

    let body = TestHarness::checkout_event("evt_1", "user_+4799999999", 99);
    let response = harness
        .server
        .post("/webhooks/payments")
        .add_header("stripe-signature", TestHarness::sign_webhook(&body))
        .text(body.clone())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // The event was not marked processed: registering and replaying applies it.
    harness.register("+4799999999").await;
    let response = harness
        .server
        .post("/webhooks/payments")
        .add_header("stripe-signature", TestHarness::sign_webhook(&body))
        .text(body)
        .await;
    response.assert_status_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["outcome"], "applied");
}
