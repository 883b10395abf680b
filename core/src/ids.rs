//! Identifier types for coingram.
//!
//! This module provides strongly-typed identifiers for phone numbers, accounts,
//! and memory-bank entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Prefix for account identifiers derived from phone numbers.
const ACCOUNT_ID_PREFIX: &str = "user_";

/// A normalized phone number in E.164-like form (`+` followed by digits).
///
/// Normalization strips spaces, dashes, and parentheses; numbers without a
/// leading `+` get one prepended after leading zeros are removed. The
/// normalized form is the mailbox key for deliveries.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and normalize a raw phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleaned number is not `+` followed by
    /// 5 to 15 digits.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        let normalized = match cleaned.strip_prefix('+') {
            Some(rest) => format!("+{rest}"),
            None => format!("+{}", cleaned.trim_start_matches('0')),
        };

        let digits = &normalized[1..];
        if digits.len() < 5 || digits.len() > 15 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidPhoneNumber);
        }

        Ok(Self(normalized))
    }

    /// Return the normalized string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhoneNumber({})", self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<[u8]> for PhoneNumber {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// An account identifier, derived deterministically from a normalized phone
/// number as `user_<normalized>`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Derive the account id for a phone number.
    #[must_use]
    pub fn from_phone(phone: &PhoneNumber) -> Self {
        Self(format!("{ACCOUNT_ID_PREFIX}{}", phone.as_str()))
    }

    /// Return the string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let phone = s
            .strip_prefix(ACCOUNT_ID_PREFIX)
            .ok_or(IdError::InvalidAccountId)?;
        // Re-derive so only canonical forms round-trip.
        let phone = PhoneNumber::parse(phone).map_err(|_| IdError::InvalidAccountId)?;
        Ok(Self::from_phone(&phone))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A memory-bank entry identifier using ULID for time-ordering.
///
/// Entries for a user sort by insertion time when keyed by this id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemoryEntryId(Ulid);

impl MemoryEntryId {
    /// Generate a new `MemoryEntryId` with the current timestamp.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Return the bytes of the ULID (16 bytes).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Create a `MemoryEntryId` from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Ulid::from_bytes(bytes))
    }
}

impl FromStr for MemoryEntryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for MemoryEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryEntryId({})", self.0)
    }
}

impl fmt::Display for MemoryEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MemoryEntryId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemoryEntryId> for String {
    fn from(id: MemoryEntryId) -> Self {
        id.0.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input does not normalize to a valid phone number.
    #[error("invalid phone number")]
    InvalidPhoneNumber,

    /// The input is not a valid account identifier.
    #[error("invalid account id")]
    InvalidAccountId,

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,
}
