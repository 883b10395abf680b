//! Delivery mailbox types.
//!
//! Each recipient has a single mailbox slot holding at most one undelivered
//! item. A later deposit overwrites whatever is in the slot; that is the
//! designed last-writer-wins behavior, not a queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, MemoryEntryId};

/// The item being delivered: a themed kind plus a free-text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Item kind, matching a key in the pricing table.
    pub kind: String,

    /// Free-text message accompanying the item.
    pub message: String,
}

/// Lifecycle of a mailbox slot.
///
/// Pending → Seen on the recipient's first read. A Seen slot reads as empty
/// and is removed by an explicit flush or overwritten by the next deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Deposited and not yet read by the recipient.
    Pending,

    /// Consumed by the recipient's first read.
    Seen,
}

/// A delivery occupying a recipient's mailbox slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    /// The delivered item.
    pub payload: Payload,

    /// Sending account. Kept for anti-abuse only, never shown to the
    /// recipient.
    pub sender: AccountId,

    /// Slot lifecycle state.
    pub state: DeliveryState,

    /// When the delivery landed in the slot.
    pub received_at: DateTime<Utc>,
}

impl Delivery {
    /// Create a pending delivery stamped with the current time.
    #[must_use]
    pub fn new(payload: Payload, sender: AccountId) -> Self {
        Self {
            payload,
            sender,
            state: DeliveryState::Pending,
            received_at: Utc::now(),
        }
    }
}

/// A payload the recipient chose to keep in their memory bank.
///
/// The memory bank is an append-only, insertion-ordered log, separate from
/// the single-slot mailbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedPayload {
    /// Time-ordered entry id.
    pub id: MemoryEntryId,

    /// The archived item.
    pub payload: Payload,

    /// When the entry was archived.
    pub saved_at: DateTime<Utc>,
}

impl ArchivedPayload {
    /// Archive a payload, stamping it with a fresh time-ordered id.
    #[must_use]
    pub fn new(payload: Payload) -> Self {
        Self {
            id: MemoryEntryId::generate(),
            payload,
            saved_at: Utc::now(),
        }
    }
}
