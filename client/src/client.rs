//! Coingram HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    AccountResponse, ApiErrorResponse, GiftRequest, GiftResponse, MemoryResponse,
    PurchaseResponse, RegisterRequest, SendRequest, SendResponse, TakeResponse,
};

/// Coingram API client.
///
/// A thin typed wrapper over the service's HTTP surface, for app backends
/// and tooling.
#[derive(Debug, Clone)]
pub struct CoingramClient {
    client: Client,
    base_url: String,
}

impl CoingramClient {
    /// Create a new coingram client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the coingram service (e.g., `"http://coingram:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new coingram client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Register an account (idempotent).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn register(&self, phone: impl Into<String>) -> Result<AccountResponse, ClientError> {
        let url = format!("{}/v1/accounts", self.base_url);
        let request = RegisterRequest {
            phone: phone.into(),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        Self::handle_response(response).await
    }

    /// Get an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_account(&self, account_id: &str) -> Result<AccountResponse, ClientError> {
        let url = format!("{}/v1/accounts/{}", self.base_url, account_id);

        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// Register a push device token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn register_device_token(
        &self,
        account_id: &str,
        token: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/v1/accounts/{}/device-token", self.base_url, account_id);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Submit an unlock code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the code is wrong.
    pub async fn unlock(
        &self,
        account_id: &str,
        code: &str,
    ) -> Result<AccountResponse, ClientError> {
        let url = format!("{}/v1/accounts/{}/unlock", self.base_url, account_id);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Send an item to a recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn send(&self, request: SendRequest) -> Result<SendResponse, ClientError> {
        let url = format!("{}/v1/send", self.base_url);

        let response = self.client.post(&url).json(&request).send().await?;
        Self::handle_response(response).await
    }

    /// Gift coins to another user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn gift(&self, request: GiftRequest) -> Result<GiftResponse, ClientError> {
        let url = format!("{}/v1/gift", self.base_url);

        let response = self.client.post(&url).json(&request).send().await?;
        Self::handle_response(response).await
    }

    /// Take the pending delivery from a mailbox, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn take_mailbox(&self, phone: &str) -> Result<TakeResponse, ClientError> {
        let url = format!("{}/v1/mailbox/take", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Flush a mailbox slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn flush_mailbox(&self, phone: &str) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/v1/mailbox/flush", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Keep a payload in the memory bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn archive(
        &self,
        phone: &str,
        kind: &str,
        message: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/v1/mailbox/archive", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "phone": phone,
                "kind": kind,
                "message": message
            }))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// List archived payloads, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn memory(
        &self,
        phone: &str,
        limit: usize,
        offset: usize,
    ) -> Result<MemoryResponse, ClientError> {
        let url = format!("{}/v1/mailbox/memory", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("phone", phone),
                ("limit", &limit.to_string()),
                ("offset", &offset.to_string()),
            ])
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Initiate a coin purchase; returns the checkout URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn purchase(
        &self,
        account_id: &str,
        coins: i64,
    ) -> Result<PurchaseResponse, ClientError> {
        let url = format!("{}/v1/purchase", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "account_id": account_id,
                "coins": coins
            }))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        tracing::debug!(status = %status, "coingram API returned an error status");

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                // Map specific error codes to typed errors
                match code {
                    "insufficient_funds" => {
                        let balance = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("balance"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);
                        let required = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("required"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);

                        Err(ClientError::InsufficientFunds { balance, required })
                    }
                    "invalid_recipient" => Err(ClientError::InvalidRecipient(message)),
                    "not_found" if message.contains("account") => {
                        Err(ClientError::AccountNotFound(
                            message.replace("account not found: ", ""),
                        ))
                    }
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
