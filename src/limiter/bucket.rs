//! Token Bucket Module
//!
//! A single client's quota: up to `capacity` tokens, refilled continuously.

use std::time::Instant;

// == Token Bucket ==
/// Token bucket holding between zero and `capacity` tokens.
///
/// Refill is lazy: tokens accrue for the time elapsed since `last_refill`
/// whenever the bucket is observed.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    /// Maximum number of tokens
    capacity: u32,
    /// Tokens added per second
    refill_per_sec: f64,
    /// Current token count, in [0, capacity]
    tokens: f64,
    /// Instant of the last refill
    last_refill: Instant,
}

impl TokenBucket {
    // == Constructor ==
    /// Creates a full bucket.
    pub fn new(capacity: u32, refill_per_sec: f64, now: Instant) -> Self {
        Self {
            capacity,
            refill_per_sec,
            tokens: capacity as f64,
            last_refill: now,
        }
    }

    // == Refill ==
    /// Adds the tokens accrued since the last refill, capped at capacity.
    pub fn refill(&mut self, now: Instant) {
        if now <= self.last_refill {
            return;
        }
        self.tokens = self.tokens_at(now);
        self.last_refill = now;
    }

    // == Try Consume ==
    /// Refills, then takes one token if available.
    ///
    /// Leaves the token count untouched on denial.
    pub fn try_consume(&mut self, now: Instant) -> bool {
        self.refill(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    // == Tokens At ==
    /// Token count as of `now`, without mutating the bucket.
    pub fn tokens_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        (self.tokens + elapsed * self.refill_per_sec).min(self.capacity as f64)
    }

    /// Whole tokens available at `now`.
    pub fn remaining_at(&self, now: Instant) -> u32 {
        self.tokens_at(now).floor() as u32
    }

    /// True once the bucket has refilled to capacity.
    pub fn is_full_at(&self, now: Instant) -> bool {
        self.tokens_at(now) >= self.capacity as f64
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
