//! Purchase reconciliation types.
//!
//! A `PurchaseEvent` is the durable record that a payment-provider event was
//! converted into a coin credit. Its presence is the idempotency guard
//! against provider-side redelivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// A reconciled payment event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseEvent {
    /// Payment-provider event id. Each id is applied at most once.
    pub event_id: String,

    /// The credited account.
    pub account: AccountId,

    /// Amount paid, in cents.
    pub amount_cents: i64,

    /// Coins credited for the payment.
    pub credited_coins: i64,

    /// When the event was reconciled.
    pub processed_at: DateTime<Utc>,
}

/// A purchasable coin bundle at a fixed price point.
///
/// Payments reconcile by exact amount lookup against this list; an amount
/// matching no bundle is rejected rather than credited pro rata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinBundle {
    /// Coins granted by the bundle.
    pub coins: i64,

    /// Price in cents.
    pub amount_cents: i64,
}

/// The fixed bundle catalog.
#[must_use]
pub fn default_bundles() -> Vec<CoinBundle> {
    vec![
        CoinBundle {
            coins: 50,
            amount_cents: 99,
        },
        CoinBundle {
            coins: 100,
            amount_cents: 199,
        },
        CoinBundle {
            coins: 300,
            amount_cents: 499,
        },
    ]
}

/// Look up a bundle by the exact amount paid.
#[must_use]
pub fn bundle_for_amount(bundles: &[CoinBundle], amount_cents: i64) -> Option<CoinBundle> {
    bundles
        .iter()
        .copied()
        .find(|b| b.amount_cents == amount_cents)
}

/// Look up a bundle by its coin size.
#[must_use]
pub fn bundle_for_coins(bundles: &[CoinBundle], coins: i64) -> Option<CoinBundle> {
    bundles.iter().copied().find(|b| b.coins == coins)
}
