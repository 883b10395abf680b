//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode, Options,
    WriteBatch,
};

use coingram_core::{
    Account, AccountId, ArchivedPayload, Delivery, DeliveryState, PhoneNumber, PurchaseEvent,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{PurchaseOutcome, Store};

/// Number of lock stripes serializing per-key read-modify-write sequences.
const LOCK_STRIPES: usize = 16;

/// RocksDB-backed storage implementation.
///
/// Mutations of a single record are serialized through striped mutexes keyed
/// by the record key; compound operations take every stripe they touch, in
/// stripe order, before reading.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<rocksdb::MultiThreaded>>,
    locks: Vec<Mutex<()>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            locks: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stripe_of(key: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % LOCK_STRIPES
    }

    /// Lock the stripe guarding `key`.
    fn lock_one(&self, key: &[u8]) -> MutexGuard<'_, ()> {
        self.locks[Self::stripe_of(key)]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the stripes guarding two keys, in stripe order.
    ///
    /// Taking stripes in ascending index order makes concurrent two-key
    /// operations deadlock-free. The second guard is absent when both keys
    /// share a stripe.
    fn lock_pair(&self, a: &[u8], b: &[u8]) -> (MutexGuard<'_, ()>, Option<MutexGuard<'_, ()>>) {
        let (ia, ib) = (Self::stripe_of(a), Self::stripe_of(b));
        if ia == ib {
            (
                self.locks[ia]
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
                None,
            )
        } else {
            let (first, second) = (ia.min(ib), ia.max(ib));
            let g1 = self.locks[first]
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let g2 = self.locks[second]
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            (g1, Some(g2))
        }
    }

    fn get_account_raw(&self, account_id: &AccountId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        self.db
            .get_cf(&cf, keys::account_key(account_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn put_account_raw(&self, account: &Account) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let value = Self::serialize(account)?;
        self.db
            .put_cf(&cf, keys::account_key(&account.id), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn get_mailbox_raw(&self, recipient: &PhoneNumber) -> Result<Option<Delivery>> {
        let cf = self.cf(cf::MAILBOXES)?;
        self.db
            .get_cf(&cf, keys::mailbox_key(recipient))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn put_account(&self, account: &Account) -> Result<()> {
        let _guard = self.lock_one(&keys::account_key(&account.id));
        self.put_account_raw(account)
    }

    fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>> {
        self.get_account_raw(account_id)
    }

    fn register_account(
        &self,
        phone: &PhoneNumber,
        starting_grant: i64,
    ) -> Result<(Account, bool)> {
        let account_id = AccountId::from_phone(phone);
        let _guard = self.lock_one(&keys::account_key(&account_id));

        if let Some(mut account) = self.get_account_raw(&account_id)? {
            // Identity refresh only. Balance and flags survive re-registration.
            account.phone = phone.clone();
            account.updated_at = chrono::Utc::now();
            self.put_account_raw(&account)?;
            return Ok((account, false));
        }

        let account = Account::new(phone.clone(), starting_grant);
        self.put_account_raw(&account)?;
        Ok((account, true))
    }

    fn set_device_token(&self, account_id: &AccountId, token: &str) -> Result<()> {
        let _guard = self.lock_one(&keys::account_key(account_id));

        let mut account = self
            .get_account_raw(account_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                id: account_id.to_string(),
            })?;

        account.device_token = Some(token.to_string());
        account.updated_at = chrono::Utc::now();
        self.put_account_raw(&account)
    }

    fn set_unlimited(&self, account_id: &AccountId) -> Result<()> {
        let _guard = self.lock_one(&keys::account_key(account_id));

        let mut account = self
            .get_account_raw(account_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                id: account_id.to_string(),
            })?;

        account.unlimited = true;
        account.updated_at = chrono::Utc::now();
        self.put_account_raw(&account)
    }

    fn try_debit(&self, account_id: &AccountId, amount: i64) -> Result<i64> {
        let _guard = self.lock_one(&keys::account_key(account_id));

        let mut account = self
            .get_account_raw(account_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                id: account_id.to_string(),
            })?;

        if account.unlimited {
            return Ok(account.balance);
        }

        if account.balance < amount {
            return Err(StoreError::InsufficientFunds {
                balance: account.balance,
                required: amount,
            });
        }

        account.balance -= amount;
        account.updated_at = chrono::Utc::now();
        self.put_account_raw(&account)?;

        Ok(account.balance)
    }

    fn credit(&self, account_id: &AccountId, amount: i64) -> Result<i64> {
        let _guard = self.lock_one(&keys::account_key(account_id));

        let mut account = self
            .get_account_raw(account_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                id: account_id.to_string(),
            })?;

        account.balance += amount;
        account.updated_at = chrono::Utc::now();
        self.put_account_raw(&account)?;

        Ok(account.balance)
    }

    // =========================================================================
    // Mailbox Operations
    // =========================================================================

    fn deposit(&self, recipient: &PhoneNumber, delivery: &Delivery) -> Result<()> {
        let key = keys::mailbox_key(recipient);
        let _guard = self.lock_one(&key);

        let cf = self.cf(cf::MAILBOXES)?;
        let value = Self::serialize(delivery)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn take_if_pending(&self, recipient: &PhoneNumber) -> Result<Option<Delivery>> {
        let key = keys::mailbox_key(recipient);
        let _guard = self.lock_one(&key);

        let Some(mut delivery) = self.get_mailbox_raw(recipient)? else {
            return Ok(None);
        };

        if delivery.state != DeliveryState::Pending {
            return Ok(None);
        }

        delivery.state = DeliveryState::Seen;

        let cf = self.cf(cf::MAILBOXES)?;
        let value = Self::serialize(&delivery)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Some(delivery))
    }

    fn clear_mailbox(&self, recipient: &PhoneNumber) -> Result<()> {
        let key = keys::mailbox_key(recipient);
        let _guard = self.lock_one(&key);

        let cf = self.cf(cf::MAILBOXES)?;
        self.db
            .delete_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    // =========================================================================
    // Memory Bank Operations
    // =========================================================================

    fn append_memory(&self, phone: &PhoneNumber, entry: &ArchivedPayload) -> Result<()> {
        let cf = self.cf(cf::MEMORY_BANK)?;
        let key = keys::memory_entry_key(phone, &entry.id);
        let value = Self::serialize(entry)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn list_memory(
        &self,
        phone: &PhoneNumber,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ArchivedPayload>> {
        let cf = self.cf(cf::MEMORY_BANK)?;
        let prefix = keys::memory_prefix(phone);

        let mut entries = Vec::new();
        let mut skipped = 0;

        // ULID-suffixed keys iterate oldest first.
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            if skipped < offset {
                skipped += 1;
                continue;
            }

            if entries.len() >= limit {
                break;
            }

            entries.push(Self::deserialize(&value)?);
        }

        Ok(entries)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn send_paid(
        &self,
        sender: &AccountId,
        cost: i64,
        recipient: &PhoneNumber,
        delivery: &Delivery,
    ) -> Result<i64> {
        let sender_key = keys::account_key(sender);
        let mailbox_key = keys::mailbox_key(recipient);
        let _guards = self.lock_pair(&sender_key, &mailbox_key);

        let mut account = self
            .get_account_raw(sender)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                id: sender.to_string(),
            })?;

        if !account.has_sufficient_coins(cost) {
            return Err(StoreError::InsufficientFunds {
                balance: account.balance,
                required: cost,
            });
        }

        if !account.unlimited {
            account.balance -= cost;
        }
        account.updated_at = chrono::Utc::now();

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_mailboxes = self.cf(cf::MAILBOXES)?;

        let account_value = Self::serialize(&account)?;
        let delivery_value = Self::serialize(delivery)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, &sender_key, &account_value);
        batch.put_cf(&cf_mailboxes, &mailbox_key, &delivery_value);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(account.balance)
    }

    fn transfer(
        &self,
        sender: &AccountId,
        recipient_phone: &PhoneNumber,
        amount: i64,
        auto_vivify: bool,
    ) -> Result<(i64, i64)> {
        let recipient = AccountId::from_phone(recipient_phone);
        let sender_key = keys::account_key(sender);
        let recipient_key = keys::account_key(&recipient);
        let _guards = self.lock_pair(&sender_key, &recipient_key);

        let sender_account =
            self.get_account_raw(sender)?
                .ok_or_else(|| StoreError::NotFound {
                    entity: "account",
                    id: sender.to_string(),
                })?;

        if !sender_account.has_sufficient_coins(amount) {
            return Err(StoreError::InsufficientFunds {
                balance: sender_account.balance,
                required: amount,
            });
        }

        // A self-transfer is a no-op: debit and credit cancel on one record.
        if *sender == recipient {
            return Ok((sender_account.balance, sender_account.balance));
        }

        let mut sender_account = sender_account;
        let mut recipient_account = match self.get_account_raw(&recipient)? {
            Some(account) => account,
            None if auto_vivify => Account::new(recipient_phone.clone(), 0),
            None => {
                return Err(StoreError::NotFound {
                    entity: "recipient",
                    id: recipient.to_string(),
                })
            }
        };

        let now = chrono::Utc::now();
        if !sender_account.unlimited {
            sender_account.balance -= amount;
        }
        sender_account.updated_at = now;
        recipient_account.balance += amount;
        recipient_account.updated_at = now;

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let sender_value = Self::serialize(&sender_account)?;
        let recipient_value = Self::serialize(&recipient_account)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, &sender_key, &sender_value);
        batch.put_cf(&cf_accounts, &recipient_key, &recipient_value);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok((sender_account.balance, recipient_account.balance))
    }

    fn apply_purchase(&self, event: &PurchaseEvent) -> Result<PurchaseOutcome> {
        let account_key = keys::account_key(&event.account);
        let _guard = self.lock_one(&account_key);

        if self.has_purchase_event(&event.event_id)? {
            tracing::debug!(event_id = %event.event_id, "purchase event already processed");
            return Ok(PurchaseOutcome::Skipped);
        }

        let mut account =
            self.get_account_raw(&event.account)?
                .ok_or_else(|| StoreError::NotFound {
                    entity: "account",
                    id: event.account.to_string(),
                })?;

        account.balance += event.credited_coins;
        account.updated_at = chrono::Utc::now();

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_events = self.cf(cf::PURCHASE_EVENTS)?;

        let account_value = Self::serialize(&account)?;
        let event_value = Self::serialize(event)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, &account_key, &account_value);
        batch.put_cf(&cf_events, keys::purchase_event_key(&event.event_id), &event_value);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(PurchaseOutcome::Applied {
            new_balance: account.balance,
        })
    }

    fn has_purchase_event(&self, event_id: &str) -> Result<bool> {
        let cf = self.cf(cf::PURCHASE_EVENTS)?;
        let exists = self
            .db
            .get_cf(&cf, keys::purchase_event_key(event_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        Ok(exists)
    }
}
