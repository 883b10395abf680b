//! Send and gift integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

fn send_body(sender: &str, recipient: &str, kind: &str, message: &str) -> serde_json::Value {
    json!({
        "sender_id": sender,
        "recipient_phone": recipient,
        "item_kind": kind,
        "message": message
    })
}

// ============================================================================
// Send
// ============================================================================

#[tokio::test]
async fn send_debits_and_delivers() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    // 3 words, within the free allowance: cost is the base price only.
    let response = harness
        .server
        .post("/v1/send")
        .json(&send_body(
            "user_+4711111111",
            "+4722222222",
            "unicorn",
            "hello there friend",
        ))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["cost"], 20);
    assert_eq!(body["balance"], 30);

    // The payload is waiting in the recipient's mailbox.
    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["delivery"]["kind"], "unicorn");
    assert_eq!(body["delivery"]["message"], "hello there friend");

    // Single consumption: the slot now reads empty.
    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["delivery"].is_null());
}

#[tokio::test]
async fn send_charges_per_extra_word() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    // 7 words: 2 beyond the free allowance of 5.
    let response = harness
        .server
        .post("/v1/send")
        .json(&send_body(
            "user_+4711111111",
            "+4722222222",
            "happy",
            "one two three four five six seven",
        ))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["cost"], 2);
    assert_eq!(body["balance"], 48);
}

#[tokio::test]
async fn send_to_unregistered_recipient_spends_nothing() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;

    let response = harness
        .server
        .post("/v1/send")
        .json(&send_body(
            "user_+4711111111",
            "+4799999999",
            "happy",
            "anyone home",
        ))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_recipient");

    let response = harness.server.get("/v1/accounts/user_+4711111111").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance"], 50);
}

#[tokio::test]
async fn send_with_insufficient_funds_is_rejected_without_side_effects() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    // golden (25) + 26 extra words = 51 > the 50-coin grant.
    let long_message = (0..31).map(|_| "word").collect::<Vec<_>>().join(" ");
    let response = harness
        .server
        .post("/v1/send")
        .json(&send_body(
            "user_+4711111111",
            "+4722222222",
            "golden",
            &long_message,
        ))
        .await;
    response.assert_status(StatusCode::PAYMENT_REQUIRED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_funds");
    assert_eq!(body["error"]["details"]["balance"], 50);
    assert_eq!(body["error"]["details"]["required"], 51);

    // Neither the balance nor the mailbox changed.
    let response = harness.server.get("/v1/accounts/user_+4711111111").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance"], 50);

    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["delivery"].is_null());
}

#[tokio::test]
async fn send_unknown_item_kind_is_rejected() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    let response = harness
        .server
        .post("/v1/send")
        .json(&send_body(
            "user_+4711111111",
            "+4722222222",
            "mystery",
            "hi",
        ))
        .await;
    response.assert_status_bad_request();

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "unknown_item_kind");
}

#[tokio::test]
async fn send_unknown_kind_is_free_when_allowed() {
    let harness = TestHarness::with_config(|config| config.pricing.allow_unknown_kinds = true);
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    let response = harness
        .server
        .post("/v1/send")
        .json(&send_body(
            "user_+4711111111",
            "+4722222222",
            "mystery",
            "hi",
        ))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["cost"], 0);
    assert_eq!(body["balance"], 50);
}

#[tokio::test]
async fn unlimited_sender_is_never_debited() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    harness
        .server
        .post("/v1/accounts/user_+4711111111/unlock")
        .json(&json!({ "code": common::UNLOCK_CODE }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post("/v1/send")
        .json(&send_body(
            "user_+4711111111",
            "+4722222222",
            "golden",
            "money is no object here friend of mine",
        ))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["balance"], 999_999);
}

// ============================================================================
// Gift
// ============================================================================

#[tokio::test]
async fn gift_conserves_coins() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    let response = harness
        .server
        .post("/v1/gift")
        .json(&json!({
            "sender_id": "user_+4711111111",
            "recipient_phone": "+4722222222",
            "amount": 15
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["sender_balance"], 35);
    assert_eq!(body["recipient_balance"], 65);

    // 50 + 50 before, 35 + 65 after: nothing created or destroyed.
    let total = body["sender_balance"].as_i64().unwrap() + body["recipient_balance"].as_i64().unwrap();
    assert_eq!(total, 100);
}

#[tokio::test]
async fn gift_requires_positive_amount() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    for amount in [0, -5] {
        let response = harness
            .server
            .post("/v1/gift")
            .json(&json!({
                "sender_id": "user_+4711111111",
                "recipient_phone": "+4722222222",
                "amount": amount
            }))
            .await;
        response.assert_status_bad_request();

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "invalid_amount");
    }
}

#[tokio::test]
async fn gift_with_insufficient_funds_is_rejected() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    let response = harness
        .server
        .post("/v1/gift")
        .json(&json!({
            "sender_id": "user_+4711111111",
            "recipient_phone": "+4722222222",
            "amount": 51
        }))
        .await;
    response.assert_status(StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn gift_to_unregistered_recipient_is_rejected_by_default() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;

    let response = harness
        .server
        .post("/v1/gift")
        .json(&json!({
            "sender_id": "user_+4711111111",
            "recipient_phone": "+4799999999",
            "amount": 10
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // No debit happened.
    let response = harness.server.get("/v1/accounts/user_+4711111111").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance"], 50);
}

#[tokio::test]
async fn gift_vivifies_recipient_when_enabled() {
    let harness = TestHarness::with_config(|config| config.auto_vivify_gifts = true);
    harness.register("+4711111111").await;

    let response = harness
        .server
        .post("/v1/gift")
        .json(&json!({
            "sender_id": "user_+4711111111",
            "recipient_phone": "+4799999999",
            "amount": 10
        }))
        .await;
    response.assert_status_ok();

    // The vivified account holds exactly the gifted amount, no grant.
    let response = harness.server.get("/v1/accounts/user_+4799999999").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["balance"], 10);
}

#[tokio::test]
async fn gift_to_self_is_rejected() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;

    let response = harness
        .server
        .post("/v1/gift")
        .json(&json!({
            "sender_id": "user_+4711111111",
            "recipient_phone": "+4711111111",
            "amount": 10
        }))
        .await;
    response.assert_status_bad_request();
}
