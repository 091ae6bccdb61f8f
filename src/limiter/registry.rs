//! Rate Limiter Module
//!
//! Per-identity admission control: one token bucket per client, created on
//! first sight and evicted once it has refilled to capacity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::error::ConfigError;
use crate::limiter::TokenBucket;

// == Rate Limit Config ==
/// Quota for one tier: `capacity` requests per `period`.
///
/// The bucket refills at `capacity / period`, so a drained bucket is full
/// again one `period` later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    /// Burst size and steady-state requests per period
    pub capacity: u32,
    /// Window over which `capacity` tokens are restored
    pub period: Duration,
}

impl RateLimitConfig {
    pub fn new(capacity: u32, period: Duration) -> Self {
        Self { capacity, period }
    }

    /// `capacity` requests per minute.
    pub fn per_minute(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    /// Tokens restored per second.
    pub fn refill_per_sec(&self) -> f64 {
        self.capacity as f64 / self.period.as_secs_f64()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity("rate limit capacity"));
        }
        if self.period.is_zero() {
            return Err(ConfigError::ZeroDuration("rate limit period"));
        }
        Ok(())
    }
}

// == Rate Limiter ==
/// Registry of token buckets keyed by an opaque client identity.
///
/// The registry lock guards membership; each bucket has its own mutex so that
/// refill and consumption for one identity happen as a single step without
/// serialising unrelated identities. `allow` holds the registry read lock
/// while it touches a bucket, which keeps `cleanup_idle` from evicting a
/// bucket mid-update.
#[derive(Debug)]
pub struct RateLimiter {
    /// Tier name used in logs
    name: &'static str,
    config: RateLimitConfig,
    buckets: RwLock<HashMap<String, Mutex<TokenBucket>>>,
}

impl RateLimiter {
    // == Constructor ==
    pub fn new(name: &'static str, config: RateLimitConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            name,
            config,
            buckets: RwLock::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Maximum burst, advertised to clients as the limit.
    pub fn limit(&self) -> u32 {
        self.config.capacity
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    // == Get Or Create Bucket ==
    /// Runs `f` on the bucket for `identity`, creating a full one if needed.
    ///
    /// Concurrent first requests for the same identity resolve to a single
    /// bucket: the write-locked path re-checks through `entry`.
    fn with_bucket<T>(&self, identity: &str, f: impl FnOnce(&mut TokenBucket) -> T) -> T {
        {
            let buckets = self.buckets.read();
            if let Some(bucket) = buckets.get(identity) {
                return f(&mut *bucket.lock());
            }
        }

        let mut buckets = self.buckets.write();
        let bucket = buckets.entry(identity.to_string()).or_insert_with(|| {
            Mutex::new(TokenBucket::new(
                self.config.capacity,
                self.config.refill_per_sec(),
                Instant::now(),
            ))
        });
        f(bucket.get_mut())
    }

    /// Returns a snapshot of the bucket for `identity`, creating it if absent.
    pub fn bucket(&self, identity: &str) -> TokenBucket {
        self.with_bucket(identity, |bucket| bucket.clone())
    }

    // == Allow ==
    /// Admits one request for `identity` if a token is available.
    pub fn allow(&self, identity: &str) -> bool {
        let allowed = self.with_bucket(identity, |bucket| bucket.try_consume(Instant::now()));

        if !allowed {
            debug!(tier = self.name, identity = %identity, "Rate limit exceeded");
        }
        allowed
    }

    // == Remaining ==
    /// Whole tokens currently available to `identity`.
    ///
    /// An identity with no bucket has its full quota; no bucket is created.
    pub fn remaining(&self, identity: &str) -> u32 {
        let buckets = self.buckets.read();
        match buckets.get(identity) {
            Some(bucket) => bucket.lock().remaining_at(Instant::now()),
            None => self.config.capacity,
        }
    }

    // == Cleanup Idle ==
    /// Evicts every bucket that has refilled to capacity.
    ///
    /// A bucket drained and since refilled looks the same as one never used,
    /// so both are dropped. This only loses state identical to a fresh bucket,
    /// which starts full, so eviction never grants extra tokens.
    ///
    /// Returns the number of buckets evicted.
    pub fn cleanup_idle(&self) -> usize {
        let now = Instant::now();
        let mut buckets = self.buckets.write();

        let before = buckets.len();
        buckets.retain(|_, bucket| !bucket.get_mut().is_full_at(now));
        before - buckets.len()
    }

    // == Length ==
    /// Number of tracked identities.
    pub fn len(&self) -> usize {
        self.buckets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.read().is_empty()
    }
}
