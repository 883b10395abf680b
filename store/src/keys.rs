//! Key encoding utilities for `RocksDB`.

use coingram_core::{AccountId, MemoryEntryId, PhoneNumber};

/// Separator between the phone prefix and the entry id in memory-bank keys.
///
/// Normalized phone numbers contain only `+` and digits, so `/` can never
/// appear inside the prefix.
const MEMORY_KEY_SEPARATOR: u8 = b'/';

/// Create an account key from an account id.
#[must_use]
pub fn account_key(account_id: &AccountId) -> Vec<u8> {
    account_id.as_str().as_bytes().to_vec()
}

/// Create a mailbox key from a recipient phone number.
#[must_use]
pub fn mailbox_key(phone: &PhoneNumber) -> Vec<u8> {
    phone.as_str().as_bytes().to_vec()
}

/// Create a memory-bank entry key.
///
/// Format: `phone || '/' || entry_id (16 bytes)`
///
/// ULIDs are time-ordered, so entries for a user sort by insertion time.
#[must_use]
pub fn memory_entry_key(phone: &PhoneNumber, entry_id: &MemoryEntryId) -> Vec<u8> {
    let phone = phone.as_str().as_bytes();
    let mut key = Vec::with_capacity(phone.len() + 1 + 16);
    key.extend_from_slice(phone);
    key.push(MEMORY_KEY_SEPARATOR);
    key.extend_from_slice(&entry_id.to_bytes());
    key
}

/// Create a prefix for iterating all memory-bank entries for a user.
#[must_use]
pub fn memory_prefix(phone: &PhoneNumber) -> Vec<u8> {
    let phone = phone.as_str().as_bytes();
    let mut prefix = Vec::with_capacity(phone.len() + 1);
    prefix.extend_from_slice(phone);
    prefix.push(MEMORY_KEY_SEPARATOR);
    prefix
}

/// Create a purchase event key from a provider event id.
#[must_use]
pub fn purchase_event_key(event_id: &str) -> Vec<u8> {
    event_id.as_bytes().to_vec()
}
