//! Ledger handlers: paid sends and peer-to-peer gifts.
//!
//! A send walks Priced → Authorized → Delivered, with notification dispatch
//! trailing as best-effort. The debit and the mailbox deposit are one storage
//! batch; a rejected send has no side effects at all.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use coingram_core::{AccountId, Delivery, Payload, PhoneNumber, UNLIMITED_DISPLAY_BALANCE};
use coingram_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Notification title for incoming deliveries.
const DELIVERY_TITLE: &str = "Incoming delivery!";

/// Notification body for incoming deliveries.
const DELIVERY_BODY: &str = "Someone sent you a gram";

/// Screen the client opens when the notification is tapped.
const DELIVERY_ROUTE: &str = "ReceivedGram";

/// Send request.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    /// Sending account.
    pub sender_id: String,
    /// Recipient phone number.
    pub recipient_phone: String,
    /// Item kind, priced from the pricing table.
    pub item_kind: String,
    /// Message accompanying the item.
    #[serde(default)]
    pub message: String,
}

/// Send response.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    /// Coins charged for this send.
    pub cost: i64,
    /// Sender balance after the debit (display value).
    pub balance: i64,
}

/// Send an item to a recipient's mailbox.
pub async fn send(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let sender_id: AccountId = body.sender_id.parse()?;
    let recipient_phone = PhoneNumber::parse(&body.recipient_phone)?;

    // Resolve the recipient first: coins are never spent on a target that
    // cannot receive.
    let recipient_id = AccountId::from_phone(&recipient_phone);
    let recipient = state
        .store
        .get_account(&recipient_id)?
        .ok_or_else(|| ApiError::InvalidRecipient(format!("not registered: {recipient_phone}")))?;

    let sender = state
        .store
        .get_account(&sender_id)?
        .ok_or_else(|| ApiError::NotFound(format!("account not found: {sender_id}")))?;

    let cost = state.config.pricing.price(&body.item_kind, &body.message)?;

    let delivery = Delivery::new(
        Payload {
            kind: body.item_kind.clone(),
            message: body.message.clone(),
        },
        sender_id.clone(),
    );

    let balance = state
        .store
        .send_paid(&sender_id, cost, &recipient_phone, &delivery)?;

    tracing::info!(
        sender = %sender_id,
        item_kind = %body.item_kind,
        cost = %cost,
        new_balance = %balance,
        "Item delivered"
    );

    // Notify the recipient without holding the response: the payload is
    // already durably deposited, so a lost push only delays discovery.
    if let Some(token) = recipient.device_token {
        let push = state.push.clone();
        tokio::spawn(async move {
            if let Err(e) = push
                .notify(&token, DELIVERY_TITLE, DELIVERY_BODY, DELIVERY_ROUTE)
                .await
            {
                tracing::warn!(error = %e, "Failed to push delivery notification");
            }
        });
    } else {
        tracing::debug!(recipient = %recipient_id, "Recipient has no device token, skipping push");
    }

    let display_balance = if sender.unlimited {
        UNLIMITED_DISPLAY_BALANCE
    } else {
        balance
    };

    Ok(Json(SendResponse {
        cost,
        balance: display_balance,
    }))
}

/// Gift request.
#[derive(Debug, Deserialize)]
pub struct GiftRequest {
    /// Sending account.
    pub sender_id: String,
    /// Recipient phone number.
    pub recipient_phone: String,
    /// Coins to transfer.
    pub amount: i64,
}

/// Gift response.
#[derive(Debug, Serialize)]
pub struct GiftResponse {
    /// Sender balance after the transfer.
    pub sender_balance: i64,
    /// Recipient balance after the transfer.
    pub recipient_balance: i64,
}

/// Gift coins to another user.
pub async fn gift(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GiftRequest>,
) -> Result<Json<GiftResponse>, ApiError> {
    let sender_id: AccountId = body.sender_id.parse()?;
    let recipient_phone = PhoneNumber::parse(&body.recipient_phone)?;

    if body.amount <= 0 {
        return Err(ApiError::InvalidAmount(format!(
            "gift amount must be positive, got {}",
            body.amount
        )));
    }

    if sender_id == AccountId::from_phone(&recipient_phone) {
        return Err(ApiError::InvalidAmount("cannot gift to yourself".into()));
    }

    let sender = state
        .store
        .get_account(&sender_id)?
        .ok_or_else(|| ApiError::NotFound(format!("account not found: {sender_id}")))?;

    let (sender_balance, recipient_balance) = state.store.transfer(
        &sender_id,
        &recipient_phone,
        body.amount,
        state.config.auto_vivify_gifts,
    )?;

    tracing::info!(
        sender = %sender_id,
        amount = %body.amount,
        sender_balance = %sender_balance,
        "Coins gifted"
    );

    let sender_balance = if sender.unlimited {
        UNLIMITED_DISPLAY_BALANCE
    } else {
        sender_balance
    };

    Ok(Json(GiftResponse {
        sender_balance,
        recipient_balance,
    }))
}
