//! Account types for coingram.
//!
//! An account holds the coin balance and delivery metadata for one phone
//! number. Accounts are created on first registration and never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, PhoneNumber};

/// Balance reported for unlimited accounts.
///
/// Unlimited accounts are exempt from debit checks; clients render this
/// sentinel as an infinite balance.
pub const UNLIMITED_DISPLAY_BALANCE: i64 = 999_999;

/// A coin account for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The account id, derived from the phone number.
    pub id: AccountId,

    /// The owner's normalized phone number.
    pub phone: PhoneNumber,

    /// Current coin balance. Never negative.
    pub balance: i64,

    /// Unlimited accounts always pass debit checks and are never decremented.
    pub unlimited: bool,

    /// Push token for delivery notifications, if registered.
    pub device_token: Option<String>,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with the given starting grant.
    #[must_use]
    pub fn new(phone: PhoneNumber, starting_grant: i64) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::from_phone(&phone),
            phone,
            balance: starting_grant,
            unlimited: false,
            device_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether a debit of `amount` would succeed.
    #[must_use]
    pub fn has_sufficient_coins(&self, amount: i64) -> bool {
        self.unlimited || self.balance >= amount
    }

    /// The balance to report to clients.
    #[must_use]
    pub fn display_balance(&self) -> i64 {
        if self.unlimited {
            UNLIMITED_DISPLAY_BALANCE
        } else {
            self.balance
        }
    }
}
