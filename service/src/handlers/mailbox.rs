//! Mailbox handlers: take, flush, archive, and the memory bank.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use coingram_core::{ArchivedPayload, Delivery, Payload, PhoneNumber};
use coingram_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// A delivered payload as shown to the recipient.
///
/// The sender is deliberately absent: it is stored for anti-abuse only.
#[derive(Debug, Serialize)]
pub struct DeliveryView {
    /// Item kind.
    pub kind: String,
    /// Message accompanying the item.
    pub message: String,
    /// When the delivery landed.
    pub received_at: String,
}

impl From<&Delivery> for DeliveryView {
    fn from(delivery: &Delivery) -> Self {
        Self {
            kind: delivery.payload.kind.clone(),
            message: delivery.payload.message.clone(),
            received_at: delivery.received_at.to_rfc3339(),
        }
    }
}

/// Request addressing a mailbox by phone number.
#[derive(Debug, Deserialize)]
pub struct MailboxRequest {
    /// The mailbox owner's phone number.
    pub phone: String,
}

/// Take response: the pending delivery, or nothing.
#[derive(Debug, Serialize)]
pub struct TakeResponse {
    /// The delivery, absent if the slot is empty or already seen.
    pub delivery: Option<DeliveryView>,
}

/// Atomically take the pending delivery, if any.
///
/// Only the first call after a deposit observes the payload; the slot then
/// reads empty until the next deposit.
pub async fn take(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MailboxRequest>,
) -> Result<Json<TakeResponse>, ApiError> {
    let phone = PhoneNumber::parse(&body.phone)?;

    let delivery = state.store.take_if_pending(&phone)?;

    Ok(Json(TakeResponse {
        delivery: delivery.as_ref().map(DeliveryView::from),
    }))
}

/// Flush the mailbox slot regardless of state.
pub async fn flush(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MailboxRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let phone = PhoneNumber::parse(&body.phone)?;

    state.store.clear_mailbox(&phone)?;

    tracing::debug!(phone = %phone, "Mailbox flushed");

    Ok(Json(serde_json::json!({ "flushed": true })))
}

/// Archive request.
#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    /// The archiving user's phone number.
    pub phone: String,
    /// Item kind to keep.
    pub kind: String,
    /// Message to keep.
    #[serde(default)]
    pub message: String,
}

/// Keep a previously-taken payload in the memory bank.
pub async fn archive(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ArchiveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let phone = PhoneNumber::parse(&body.phone)?;

    let entry = ArchivedPayload::new(Payload {
        kind: body.kind,
        message: body.message,
    });
    state.store.append_memory(&phone, &entry)?;

    tracing::debug!(phone = %phone, entry = %entry.id, "Payload archived");

    Ok(Json(serde_json::json!({ "id": entry.id.to_string() })))
}

/// Memory bank query parameters.
#[derive(Debug, Deserialize)]
pub struct MemoryQuery {
    /// The owner's phone number.
    pub phone: String,
    /// Maximum number of entries to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// An archived entry as returned to clients.
#[derive(Debug, Serialize)]
pub struct MemoryEntryView {
    /// Entry id.
    pub id: String,
    /// Item kind.
    pub kind: String,
    /// Message.
    pub message: String,
    /// When the entry was archived.
    pub saved_at: String,
}

/// Memory bank listing response.
#[derive(Debug, Serialize)]
pub struct MemoryResponse {
    /// Entries, oldest first.
    pub entries: Vec<MemoryEntryView>,
    /// Whether more entries exist past this page.
    pub has_more: bool,
}

/// List archived payloads, oldest first.
pub async fn memory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MemoryQuery>,
) -> Result<Json<MemoryResponse>, ApiError> {
    let phone = PhoneNumber::parse(&query.phone)?;

    // Fetch one more than requested to determine has_more
    let limit = query.limit.min(100);
    let entries = state.store.list_memory(&phone, limit + 1, query.offset)?;

    let has_more = entries.len() > limit;
    let entries: Vec<_> = entries
        .iter()
        .take(limit)
        .map(|entry| MemoryEntryView {
            id: entry.id.to_string(),
            kind: entry.payload.kind.clone(),
            message: entry.payload.message.clone(),
            saved_at: entry.saved_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(MemoryResponse { entries, has_more }))
}
