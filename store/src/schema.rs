//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `account_id`.
    pub const ACCOUNTS: &str = "accounts";

    /// Single-slot delivery mailboxes, keyed by recipient phone number.
    pub const MAILBOXES: &str = "mailboxes";

    /// Append-only archived payloads, keyed by `phone || '/' || entry_id`.
    pub const MEMORY_BANK: &str = "memory_bank";

    /// Reconciled payment events for idempotency, keyed by `event_id`.
    pub const PURCHASE_EVENTS: &str = "purchase_events";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::MAILBOXES,
        cf::MEMORY_BANK,
        cf::PURCHASE_EVENTS,
    ]
}
