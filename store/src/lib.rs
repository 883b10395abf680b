//! `RocksDB` storage layer for coingram.
//!
//! This crate provides persistent storage for accounts, delivery mailboxes,
//! the memory bank, and purchase-event idempotency records, using `RocksDB`
//! with column families.
//!
//! # Architecture
//!
//! Column families:
//!
//! - `accounts`: account records, keyed by `account_id`
//! - `mailboxes`: single-slot deliveries, keyed by recipient phone number
//! - `memory_bank`: archived payloads, keyed by `phone || '/' || entry_id`
//! - `purchase_events`: reconciled payments, keyed by provider event id
//!
//! # Concurrency
//!
//! Every read-modify-write on an account or mailbox record runs under a
//! striped per-key mutex, so concurrent mutations of the same record are
//! serialized while unrelated records proceed in parallel. Compound
//! operations (`send_paid`, `transfer`, `apply_purchase`) combine their
//! writes into a single `WriteBatch`: either every record in the operation
//! is updated or none is.
//!
//! # Example
//!
//! ```no_run
//! use coingram_store::{RocksStore, Store};
//! use coingram_core::PhoneNumber;
//!
//! let store = RocksStore::open("/tmp/coingram-db").unwrap();
//!
//! let phone = PhoneNumber::parse("+4712345678").unwrap();
//! let (account, created) = store.register_account(&phone, 50).unwrap();
//! assert!(created);
//! assert_eq!(account.balance, 50);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use coingram_core::{Account, AccountId, ArchivedPayload, Delivery, PhoneNumber, PurchaseEvent};

/// Outcome of applying a purchase event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The event was applied and the account credited.
    Applied {
        /// Balance after the credit.
        new_balance: i64,
    },

    /// The event id was already processed; nothing changed.
    Skipped,
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Insert or update an account record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_account(&self, account: &Account) -> Result<()>;

    /// Get an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>>;

    /// Create the account for a phone number, or refresh its identity fields.
    ///
    /// Idempotent: an existing account keeps its balance and flags; only the
    /// stored phone number is refreshed. Returns the account and whether it
    /// was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn register_account(&self, phone: &PhoneNumber, starting_grant: i64)
        -> Result<(Account, bool)>;

    /// Store a push device token on an account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account doesn't exist.
    fn set_device_token(&self, account_id: &AccountId, token: &str) -> Result<()>;

    /// Mark an account unlimited.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account doesn't exist.
    fn set_unlimited(&self, account_id: &AccountId) -> Result<()>;

    /// Debit an account if it has sufficient coins. Returns the new balance.
    ///
    /// Unlimited accounts always succeed and are never decremented.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the account doesn't exist.
    /// - `StoreError::InsufficientFunds` if the balance is too low.
    fn try_debit(&self, account_id: &AccountId, amount: i64) -> Result<i64>;

    /// Credit an account. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account doesn't exist.
    fn credit(&self, account_id: &AccountId, amount: i64) -> Result<i64>;

    // =========================================================================
    // Mailbox Operations
    // =========================================================================

    /// Deposit a delivery into a recipient's mailbox slot.
    ///
    /// Unconditionally overwrites whatever the slot holds; the mailbox is a
    /// single slot, not a queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn deposit(&self, recipient: &PhoneNumber, delivery: &Delivery) -> Result<()>;

    /// Atomically read-and-mark the mailbox slot.
    ///
    /// Only the first caller after a deposit observes the delivery; the slot
    /// is then marked seen and later calls return `None` until the next
    /// deposit. Two concurrent calls never both observe the same delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn take_if_pending(&self, recipient: &PhoneNumber) -> Result<Option<Delivery>>;

    /// Remove the mailbox slot regardless of its state.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn clear_mailbox(&self, recipient: &PhoneNumber) -> Result<()>;

    // =========================================================================
    // Memory Bank Operations
    // =========================================================================

    /// Append an archived payload to a user's memory bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn append_memory(&self, phone: &PhoneNumber, entry: &ArchivedPayload) -> Result<()>;

    /// List a user's archived payloads, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_memory(
        &self,
        phone: &PhoneNumber,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArchivedPayload>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Debit the sender and deposit into the recipient mailbox atomically.
    ///
    /// Returns the sender's new balance. The debit and the mailbox write are
    /// one batch: a failure leaves neither applied.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the sender doesn't exist.
    /// - `StoreError::InsufficientFunds` if the sender's balance is too low.
    fn send_paid(
        &self,
        sender: &AccountId,
        cost: i64,
        recipient: &PhoneNumber,
        delivery: &Delivery,
    ) -> Result<i64>;

    /// Move coins from one account to another atomically.
    ///
    /// Both balance changes land in one batch. An unlimited sender is not
    /// debited but the recipient is still credited. When `auto_vivify` is
    /// set, a missing recipient account is created holding exactly the
    /// transferred amount; otherwise the transfer is rejected.
    ///
    /// Returns `(sender_balance, recipient_balance)`.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` with entity `"account"` if the sender is
    ///   missing, or entity `"recipient"` if the recipient is missing and
    ///   `auto_vivify` is off.
    /// - `StoreError::InsufficientFunds` if the sender's balance is too low.
    fn transfer(
        &self,
        sender: &AccountId,
        recipient_phone: &PhoneNumber,
        amount: i64,
        auto_vivify: bool,
    ) -> Result<(i64, i64)>;

    /// Credit a purchase and mark its event processed atomically.
    ///
    /// The balance update and the idempotency record land in one batch, so a
    /// crash can never leave a credit without its marker or vice versa.
    /// Replaying a processed event id returns `PurchaseOutcome::Skipped`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the credited account doesn't exist.
    fn apply_purchase(&self, event: &PurchaseEvent) -> Result<PurchaseOutcome>;

    /// Check whether a purchase event id has been processed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_purchase_event(&self, event_id: &str) -> Result<bool>;
}
