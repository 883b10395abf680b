//! Core types for the coingram ledger and delivery service.
//!
//! This crate provides the foundational types used throughout coingram:
//!
//! - **Identifiers**: `PhoneNumber`, `AccountId`, `MemoryEntryId`
//! - **Accounts**: `Account`
//! - **Mailbox**: `Payload`, `Delivery`, `DeliveryState`, `ArchivedPayload`
//! - **Pricing**: `PricingTable`
//! - **Purchases**: `PurchaseEvent`, `CoinBundle`
//!
//! # Coin unit
//!
//! Coins are whole, non-negative integers stored as `i64`. A send costs the
//! item kind's base price plus one coin per message word beyond the free
//! allowance; coins enter the system through the registration grant, gifts,
//! and reconciled purchases.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod ids;
pub mod mailbox;
pub mod pricing;
pub mod purchase;

pub use account::{Account, UNLIMITED_DISPLAY_BALANCE};
pub use ids::{AccountId, IdError, MemoryEntryId, PhoneNumber};
pub use mailbox::{ArchivedPayload, Delivery, DeliveryState, Payload};
pub use pricing::{word_count, PricingError, PricingTable};
pub use purchase::{
    bundle_for_amount, bundle_for_coins, default_bundles, CoinBundle, PurchaseEvent,
};
