//! Coingram HTTP API service.
//!
//! This crate provides the HTTP API for the coingram ledger and delivery
//! pipeline, including:
//!
//! - Account registration and the starting coin grant
//! - Paid sends (atomic debit + mailbox deposit) and peer-to-peer gifts
//! - Mailbox take/flush/archive and the memory bank
//! - Checkout-session creation and idempotent payment-webhook reconciliation
//! - Best-effort push notification dispatch

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for routing consistency

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod payments;
pub mod push;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use payments::{CheckoutClient, PaymentError};
pub use push::{PushClient, PushError};
pub use routes::create_router;
pub use state::AppState;
