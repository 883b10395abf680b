//! Client SDK tests against a mocked service.

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coingram_client::{ClientError, CoingramClient, SendRequest};

#[tokio::test]
async fn register_parses_account() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts"))
        .and(body_json(serde_json::json!({ "phone": "+4712345678" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "account_id": "user_+4712345678",
            "phone": "+4712345678",
            "balance": 50,
            "unlimited": false,
            "has_device_token": false,
            "created_at": "2025-01-01T00:00:00Z",
            "created": true
        })))
        .mount(&server)
        .await;

    let client = CoingramClient::new(server.uri());
    let account = client.register("+4712345678").await.unwrap();

    assert_eq!(account.account_id, "user_+4712345678");
    assert_eq!(account.balance, 50);
    assert!(account.created);
}

#[tokio::test]
async fn send_maps_insufficient_funds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/send"))
        .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
            "error": {
                "code": "insufficient_funds",
                "message": "insufficient funds: balance=10, required=25",
                "details": { "balance": 10, "required": 25 }
            }
        })))
        .mount(&server)
        .await;

    let client = CoingramClient::new(server.uri());
    let result = client
        .send(SendRequest {
            sender_id: "user_+4712345678".into(),
            recipient_phone: "+4798765432".into(),
            item_kind: "golden".into(),
            message: String::new(),
        })
        .await;

    assert!(matches!(
        result,
        Err(ClientError::InsufficientFunds {
            balance: 10,
            required: 25
        })
    ));
}

#[tokio::test]
async fn send_maps_invalid_recipient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/send"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "error": {
                "code": "invalid_recipient",
                "message": "not registered: +4798765432"
            }
        })))
        .mount(&server)
        .await;

    let client = CoingramClient::new(server.uri());
    let result = client
        .send(SendRequest {
            sender_id: "user_+4712345678".into(),
            recipient_phone: "+4798765432".into(),
            item_kind: "happy".into(),
            message: "hello".into(),
        })
        .await;

    assert!(matches!(result, Err(ClientError::InvalidRecipient(_))));
}

#[tokio::test]
async fn take_mailbox_handles_empty_slot() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/mailbox/take"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "delivery": null })),
        )
        .mount(&server)
        .await;

    let client = CoingramClient::new(server.uri());
    let taken = client.take_mailbox("+4712345678").await.unwrap();
    assert!(taken.delivery.is_none());
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/accounts/user_+4712345678"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = CoingramClient::new(server.uri());
    let result = client.get_account("user_+4712345678").await;

    assert!(matches!(
        result,
        Err(ClientError::Api { status: 500, .. })
    ));
}
