//! Limiter Module
//!
//! Token-bucket admission control keyed by client identity.

mod bucket;
mod registry;

pub use bucket::TokenBucket;
pub use registry::{RateLimitConfig, RateLimiter};

/// Seconds a denied client is told to wait before retrying.
pub const RETRY_AFTER_SECS: u64 = 60;
