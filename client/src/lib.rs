//! Client SDK for the coingram service.
//!
//! Provides a typed `reqwest`-based client over the service's HTTP API:
//! registration, sends, gifts, mailbox operations, and purchases.
//!
//! # Example
//!
//! ```no_run
//! use coingram_client::{CoingramClient, SendRequest};
//!
//! # async fn example() -> Result<(), coingram_client::ClientError> {
//! let client = CoingramClient::new("http://localhost:8080");
//!
//! let account = client.register("+47 123 45 678").await?;
//!
//! client
//!     .send(SendRequest {
//!         sender_id: account.account_id,
//!         recipient_phone: "+4798765432".into(),
//!         item_kind: "golden".into(),
//!         message: "for you".into(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientOptions, CoingramClient};
pub use error::ClientError;
pub use types::{
    AccountResponse, DeliveryView, GiftRequest, GiftResponse, MemoryEntry, MemoryResponse,
    PurchaseResponse, SendRequest, SendResponse, TakeResponse,
};
