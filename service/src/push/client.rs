//! Push API client implementation.

use reqwest::Client;
use std::time::Duration;

use super::types::{PushData, PushMessage, PushTicketResponse};

/// Error type for push operations.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The device token is not a valid push token.
    #[error("invalid push token")]
    InvalidToken,

    /// The push API rejected the message.
    #[error("push API error: {0}")]
    Api(String),
}

/// Push API client (Expo-compatible).
#[derive(Debug, Clone)]
pub struct PushClient {
    client: Client,
    api_url: String,
}

impl PushClient {
    /// Outbound request timeout. Push dispatch must never hold a transaction
    /// open, so this is deliberately short.
    const TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new push client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Check whether a token has the expected push-token shape.
    #[must_use]
    pub fn is_valid_token(token: &str) -> bool {
        token.starts_with("ExponentPushToken[") && token.ends_with(']')
    }

    /// Send a notification to one device.
    ///
    /// Transport failures are retried once; anything after that is the
    /// caller's to log and swallow.
    ///
    /// # Errors
    ///
    /// - `PushError::InvalidToken` if the token shape is wrong.
    /// - `PushError::Http` if both attempts fail in transport.
    /// - `PushError::Api` if the push API reports an error ticket.
    pub async fn notify(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        route_hint: &str,
    ) -> Result<(), PushError> {
        if !Self::is_valid_token(device_token) {
            return Err(PushError::InvalidToken);
        }

        let message = PushMessage {
            to: device_token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            sound: "default".to_string(),
            data: PushData {
                screen: route_hint.to_string(),
            },
        };

        let response = match self.post(&message).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "push attempt failed, retrying once");
                self.post(&message).await?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(PushError::Api(format!("HTTP {status}")));
        }

        let tickets: PushTicketResponse = response.json().await?;
        if let Some(ticket) = tickets.data.iter().find(|t| t.status != "ok") {
            return Err(PushError::Api(
                ticket.message.clone().unwrap_or_else(|| "unknown".into()),
            ));
        }

        Ok(())
    }

    async fn post(&self, message: &PushMessage) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.api_url)
            .json(&[message])
            .send()
            .await
    }
}
