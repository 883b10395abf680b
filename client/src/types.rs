//! Wire types mirroring the coingram service API.

use serde::{Deserialize, Serialize};

/// Register account request.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Phone number in any common written form.
    pub phone: String,
}

/// Account as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    /// Account id.
    pub account_id: String,
    /// Normalized phone number.
    pub phone: String,
    /// Display balance (sentinel for unlimited accounts).
    pub balance: i64,
    /// Whether the account is unlimited.
    pub unlimited: bool,
    /// Whether a push token is registered.
    pub has_device_token: bool,
    /// Created timestamp (RFC 3339).
    pub created_at: String,
    /// Whether this call created the account (registration only).
    #[serde(default)]
    pub created: bool,
}

/// Send request.
#[derive(Debug, Clone, Serialize)]
pub struct SendRequest {
    /// Sending account.
    pub sender_id: String,
    /// Recipient phone number.
    pub recipient_phone: String,
    /// Item kind.
    pub item_kind: String,
    /// Message accompanying the item.
    pub message: String,
}

/// Send response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    /// Coins charged.
    pub cost: i64,
    /// Sender balance after the debit.
    pub balance: i64,
}

/// Gift request.
#[derive(Debug, Clone, Serialize)]
pub struct GiftRequest {
    /// Sending account.
    pub sender_id: String,
    /// Recipient phone number.
    pub recipient_phone: String,
    /// Coins to transfer.
    pub amount: i64,
}

/// Gift response.
#[derive(Debug, Clone, Deserialize)]
pub struct GiftResponse {
    /// Sender balance after the transfer.
    pub sender_balance: i64,
    /// Recipient balance after the transfer.
    pub recipient_balance: i64,
}

/// A delivered payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryView {
    /// Item kind.
    pub kind: String,
    /// Message accompanying the item.
    pub message: String,
    /// When the delivery landed (RFC 3339).
    pub received_at: String,
}

/// Take response.
#[derive(Debug, Clone, Deserialize)]
pub struct TakeResponse {
    /// The delivery, absent if the slot is empty or already seen.
    pub delivery: Option<DeliveryView>,
}

/// An archived memory-bank entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryEntry {
    /// Entry id.
    pub id: String,
    /// Item kind.
    pub kind: String,
    /// Message.
    pub message: String,
    /// When the entry was archived (RFC 3339).
    pub saved_at: String,
}

/// Memory bank listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryResponse {
    /// Entries, oldest first.
    pub entries: Vec<MemoryEntry>,
    /// Whether more entries exist past this page.
    pub has_more: bool,
}

/// Purchase response.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseResponse {
    /// Checkout URL to redirect the user to.
    pub checkout_url: String,
    /// Session ID for tracking.
    pub session_id: String,
}

/// Error response envelope from the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error detail.
    pub error: ApiErrorBody,
}

/// Error detail body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Structured details for some codes.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
