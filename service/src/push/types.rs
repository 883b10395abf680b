//! Push API types (Expo-compatible).

use serde::{Deserialize, Serialize};

/// A push message sent to one device.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    /// Target device token.
    pub to: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Sound to play on delivery.
    pub sound: String,
    /// Opaque routing data for the client app.
    pub data: PushData,
}

/// Routing data attached to a push message.
#[derive(Debug, Clone, Serialize)]
pub struct PushData {
    /// Screen the client should open when the notification is tapped.
    pub screen: String,
}

/// Response envelope from the push API.
#[derive(Debug, Clone, Deserialize)]
pub struct PushTicketResponse {
    /// One ticket per submitted message.
    #[serde(default)]
    pub data: Vec<PushTicket>,
}

/// Delivery ticket for one message.
#[derive(Debug, Clone, Deserialize)]
pub struct PushTicket {
    /// "ok" or "error".
    pub status: String,
    /// Error detail when status is "error".
    #[serde(default)]
    pub message: Option<String>,
}
