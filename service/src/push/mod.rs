//! Push notification dispatch.
//!
//! Notifications are best-effort: they run on a spawned task with a bounded
//! timeout and at most one retry, and their failure never affects the
//! transaction that triggered them.

pub mod client;
pub mod types;

pub use client::{PushClient, PushError};
pub use types::{PushMessage, PushTicket, PushTicketResponse};
