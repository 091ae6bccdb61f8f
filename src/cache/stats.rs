//! Cache Statistics Module
//!
//! Point-in-time counts of physical, live and stale entries.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the cache population.
///
/// `total` counts every physically stored entry, including expired ones that
/// the sweep has not removed yet, so it can exceed the number of live entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries physically present
    pub total: usize,
    /// Entries still visible to `get`
    pub active: usize,
    /// Entries past expiration awaiting sweep
    pub expired: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from the physical count and the expired count.
    pub fn new(total: usize, expired: usize) -> Self {
        Self {
            total,
            active: total - expired,
            expired,
        }
    }
}
