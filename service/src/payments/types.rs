//! Payment provider API types.

use serde::Deserialize;

/// A Checkout session object.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session ID.
    pub id: String,
    /// Checkout URL to redirect the user to.
    #[serde(default)]
    pub url: Option<String>,
    /// Payment status.
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Total amount in cents.
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Client reference ID (our account id).
    #[serde(default)]
    pub client_reference_id: Option<String>,
    /// Metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Inbound webhook envelope.
#[derive(Debug, Deserialize)]
pub struct PaymentWebhook {
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event ID.
    pub id: String,
    /// Event data.
    pub data: PaymentEventData,
}

/// Webhook event data container.
#[derive(Debug, Deserialize)]
pub struct PaymentEventData {
    /// Event object.
    pub object: serde_json::Value,
}

/// Provider error response envelope.
#[derive(Debug, Deserialize)]
pub struct PaymentErrorResponse {
    /// Error detail.
    pub error: PaymentErrorBody,
}

/// Provider error detail.
#[derive(Debug, Deserialize)]
pub struct PaymentErrorBody {
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: String,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}
