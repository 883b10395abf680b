//! Mailbox and memory bank integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

/// Free send used to seed a mailbox.
async fn send_free(harness: &TestHarness, sender: &str, recipient: &str, message: &str) {
    harness
        .server
        .post("/v1/send")
        .json(&json!({
            "sender_id": sender,
            "recipient_phone": recipient,
            "item_kind": "happy",
            "message": message
        }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn take_is_single_consumption() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    send_free(&harness, "user_+4711111111", "+4722222222", "first").await;

    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["delivery"]["message"], "first");

    // Exactly one reader observes the payload.
    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["delivery"].is_null());
}

#[tokio::test]
async fn later_send_overwrites_unread_delivery() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    send_free(&harness, "user_+4711111111", "+4722222222", "first").await;
    send_free(&harness, "user_+4711111111", "+4722222222", "second").await;

    // The slot holds one delivery: the earlier one is permanently gone.
    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["delivery"]["message"], "second");

    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["delivery"].is_null());
}

#[tokio::test]
async fn take_response_never_exposes_the_sender() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    send_free(&harness, "user_+4711111111", "+4722222222", "who was it").await;

    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["delivery"].get("sender").is_none());
    assert!(!body.to_string().contains("user_+4711111111"));
}

#[tokio::test]
async fn flush_empties_the_slot() {
    let harness = TestHarness::new();
    harness.register("+4711111111").await;
    harness.register("+4722222222").await;

    send_free(&harness, "user_+4711111111", "+4722222222", "flush me").await;

    harness
        .server
        .post("/v1/mailbox/flush")
        .json(&json!({ "phone": "+4722222222" }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post("/v1/mailbox/take")
        .json(&json!({ "phone": "+4722222222" }))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body["delivery"].is_null());
}

#[tokio::test]
async fn archive_and_list_memory() {
    let harness = TestHarness::new();
    harness.register("+4722222222").await;

    for message in ["one", "two", "three"] {
        harness
            .server
            .post("/v1/mailbox/archive")
            .json(&json!({
                "phone": "+4722222222",
                "kind": "golden",
                "message": message
            }))
            .await
            .assert_status_ok();
        // Entry ids are time-ordered; keep them distinct.
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let response = harness
        .server
        .get("/v1/mailbox/memory?phone=%2B4722222222")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let messages: Vec<_> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["one", "two", "three"]);
    assert_eq!(body["has_more"], false);

    // Pagination.
    let response = harness
        .server
        .get("/v1/mailbox/memory?phone=%2B4722222222&limit=2")
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["entries"].as_array().unwrap().len(), 2);
    assert_eq!(body["has_more"], true);
}

#[tokio::test]
async fn memory_is_unaffected_by_mailbox_flush() {
    let harness = TestHarness::new();
    harness.register("+4722222222").await;

    harness
        .server
        .post("/v1/mailbox/archive")
        .json(&json!({
            "phone": "+4722222222",
            "kind": "happy",
            "message": "keeper"
        }))
        .await
        .assert_status_ok();

    harness
        .server
        .post("/v1/mailbox/flush")
        .json(&json!({ "phone": "+4722222222" }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/mailbox/memory?phone=%2B4722222222")
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);
}
