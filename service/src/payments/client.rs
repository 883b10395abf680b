//! Payment provider API client and webhook signature verification.

use reqwest::Client;
use std::time::Duration;

use coingram_core::CoinBundle;

use super::types::{CheckoutSession, PaymentErrorResponse};
use crate::crypto;

/// Error type for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider API returned an error.
    #[error("payment API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Invalid webhook signature.
    #[error("invalid webhook signature")]
    InvalidSignature,
}

/// Payment provider API client.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl CheckoutClient {
    /// Create a new checkout client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create a Checkout session for purchasing a coin bundle.
    ///
    /// The buying account's id travels as `client_reference_id` so the
    /// webhook can credit the right account later.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects it.
    pub async fn create_checkout_session(
        &self,
        client_reference_id: &str,
        bundle: CoinBundle,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = vec![
            ("mode", "payment".to_string()),
            ("success_url", success_url.to_string()),
            ("cancel_url", cancel_url.to_string()),
            ("client_reference_id", client_reference_id.to_string()),
            ("line_items[0][price_data][currency]", "usd".to_string()),
            (
                "line_items[0][price_data][product_data][name]",
                "Coins".to_string(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                format!("{} coins", bundle.coins),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                bundle.amount_cents.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("metadata[coins]", bundle.coins.to_string()),
        ];

        tracing::debug!(
            client_reference_id = %client_reference_id,
            coins = %bundle.coins,
            amount_cents = %bundle.amount_cents,
            "Creating checkout session"
        );

        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<PaymentErrorResponse, _> = response.json().await;

        match error_body {
            Ok(provider_error) => Err(PaymentError::Api {
                error_type: provider_error.error.error_type,
                message: provider_error.error.message,
                code: provider_error.error.code,
            }),
            Err(_) => Err(PaymentError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

/// Verify a webhook signature header against the shared secret.
///
/// Header format: `t=timestamp,v1=signature[,v1=signature2,...]`. The signed
/// payload is `"{timestamp}.{body}"`; any matching `v1` entry passes. All
/// comparisons are constant-time.
///
/// # Errors
///
/// Returns `PaymentError::InvalidSignature` if the header is malformed or no
/// signature matches.
pub fn verify_webhook_signature(
    secret: &str,
    payload: &str,
    signature_header: &str,
) -> Result<(), PaymentError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        let mut kv = part.splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(ts)) => timestamp = Some(ts),
            (Some("v1"), Some(sig)) => signatures.push(sig),
            _ => {}
        }
    }

    let Some(timestamp) = timestamp else {
        return Err(PaymentError::InvalidSignature);
    };

    if signatures.is_empty() {
        return Err(PaymentError::InvalidSignature);
    }

    let signed_payload = format!("{timestamp}.{payload}");
    let expected = crypto::hmac_sha256_hex(secret, &signed_payload);

    let valid = signatures
        .iter()
        .any(|sig| crypto::constant_time_eq(&expected, sig));

    if valid {
        Ok(())
    } else {
        Err(PaymentError::InvalidSignature)
    }
}
