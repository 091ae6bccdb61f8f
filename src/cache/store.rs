//! Cache Store Module
//!
//! Shared TTL cache: a HashMap behind a single reader/writer lock, with lazy
//! expiration on read and a physical sweep driven from a background task.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::ConfigError;

// == TTL Cache ==
/// Thread-safe cache whose entries expire a fixed TTL after they were set.
///
/// Readers (`get`, `stats`) share the lock; writers (`set`, `delete`,
/// `sweep_expired`) take it exclusively. The lock is never held across an
/// await point, so callers may use it freely from async handlers.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// TTL applied to every `set`
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given TTL.
    ///
    /// A zero TTL would make every entry invisible on arrival and is rejected.
    pub fn new(ttl: Duration) -> Result<Self, ConfigError> {
        if ttl.is_zero() {
            return Err(ConfigError::ZeroDuration("cache ttl"));
        }

        Ok(Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        })
    }

    // == Get ==
    /// Returns the value for `key` if present and not yet expired.
    ///
    /// Expired entries are reported as missing but left in place for the
    /// sweep, so a read never needs the exclusive lock.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read();

        entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and resetting
    /// its expiration to `now + ttl`.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry::new(value, Instant::now(), self.ttl);
        self.entries.write().insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    // == Stats ==
    /// Returns a snapshot of total, active and expired entry counts.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();

        let expired = entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        CacheStats::new(entries.len(), expired)
    }

    // == Sweep Expired ==
    /// Physically removes every expired entry.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of physically stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
