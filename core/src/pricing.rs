//! Pricing configuration for coingram.
//!
//! The cost of a send is the item kind's base cost plus a per-word surcharge
//! for messages longer than the free allowance. The table is loaded once at
//! process start.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pricing table for all sendable items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTable {
    /// Base cost in coins by item kind.
    pub base_costs: HashMap<String, i64>,

    /// Number of message words included for free.
    pub free_word_allowance: usize,

    /// Cost per word beyond the free allowance.
    pub per_extra_word: i64,

    /// When true, unknown item kinds price at base cost 0 instead of being
    /// rejected. Off by default: silently-free items are the wrong default
    /// for a monetized catalog.
    pub allow_unknown_kinds: bool,
}

impl Default for PricingTable {
    fn default() -> Self {
        let mut base_costs = HashMap::new();
        base_costs.insert("happy".to_string(), 0);
        base_costs.insert("angry".to_string(), 0);
        base_costs.insert("unicorn".to_string(), 20);
        base_costs.insert("exploding".to_string(), 20);
        base_costs.insert("golden".to_string(), 25);

        Self {
            base_costs,
            free_word_allowance: 5,
            per_extra_word: 1,
            allow_unknown_kinds: false,
        }
    }
}

impl PricingTable {
    /// Compute the total cost of sending `kind` with `message`.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::UnknownKind` for a kind not in the table,
    /// unless `allow_unknown_kinds` is set.
    pub fn price(&self, kind: &str, message: &str) -> Result<i64, PricingError> {
        let base = match self.base_costs.get(kind) {
            Some(base) => *base,
            None if self.allow_unknown_kinds => 0,
            None => return Err(PricingError::UnknownKind(kind.to_string())),
        };

        Ok(base + self.extra_word_cost(message))
    }

    /// Surcharge for message words beyond the free allowance.
    #[must_use]
    pub fn extra_word_cost(&self, message: &str) -> i64 {
        let words = word_count(message);
        let extra = words.saturating_sub(self.free_word_allowance);
        i64::try_from(extra).unwrap_or(i64::MAX) * self.per_extra_word
    }
}

/// Count words by splitting on runs of whitespace after trimming.
///
/// An empty or whitespace-only message counts zero words.
#[must_use]
pub fn word_count(message: &str) -> usize {
    message.split_whitespace().count()
}

/// Errors from price computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// The item kind is not in the pricing table.
    #[error("unknown item kind: {0}")]
    UnknownKind(String),
}
