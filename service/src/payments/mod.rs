//! Payment provider integration.
//!
//! The provider handles:
//! - Checkout-session creation for coin bundle purchases
//! - Signed webhook delivery for completed payments
//!
//! Webhook reconciliation itself lives in the webhook handler; this module
//! owns the outbound client and the signature scheme.

pub mod client;
pub mod types;

pub use client::{verify_webhook_signature, CheckoutClient, PaymentError};
pub use types::{CheckoutSession, PaymentWebhook};
