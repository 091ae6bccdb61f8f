//! Cache Module
//!
//! Provides a shared in-memory cache with TTL expiration and background sweep.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Cache Keys ==
/// Builds the cache key for an operation on a subject, e.g. `stats:alice`.
pub fn cache_key(kind: &str, subject: &str) -> String {
    format!("{kind}:{subject}")
}
