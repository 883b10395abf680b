//! Common test utilities for coingram integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use coingram_service::{create_router, crypto, AppState, ServiceConfig};
use coingram_store::RocksStore;

/// Webhook signing secret used by every test harness.
pub const WEBHOOK_SECRET: &str = "whsec_test";

/// Unlock code configured in every test harness.
pub const UNLOCK_CODE: &str = "1093";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a harness with a tweaked configuration.
    pub fn with_config(tweak: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            starting_grant: 50,
            unlock_code: Some(UNLOCK_CODE.into()),
            payment_webhook_secret: Some(WEBHOOK_SECRET.into()),
            ..ServiceConfig::default()
        };
        tweak(&mut config);

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// Register an account and return its response body.
    pub async fn register(&self, phone: &str) -> serde_json::Value {
        let response = self
            .server
            .post("/v1/accounts")
            .json(&json!({ "phone": phone }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// Build a signed webhook header for a body, the way the provider does.
    pub fn sign_webhook(body: &str) -> String {
        let timestamp = "1700000000";
        let signature = crypto::hmac_sha256_hex(WEBHOOK_SECRET, &format!("{timestamp}.{body}"));
        format!("t={timestamp},v1={signature}")
    }

    /// Build a completed-checkout webhook body.
    pub fn checkout_event(event_id: &str, account_id: &str, amount_cents: i64) -> String {
        json!({
            "type": "checkout.session.completed",
            "id": event_id,
            "data": {
                "object": {
                    "payment_status": "paid",
                    "client_reference_id": account_id,
                    "amount_total": amount_cents
                }
            }
        })
        .to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
