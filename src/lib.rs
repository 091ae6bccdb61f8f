//! Reading Stats - a reading statistics API
//!
//! Serves per-user reading statistics behind a shared TTL cache and
//! per-client token-bucket rate limiting.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod scraper;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::TtlCache;
pub use config::Config;
pub use limiter::{RateLimitConfig, RateLimiter};
pub use tasks::{spawn_cache_sweep_task, spawn_limiter_cleanup_task};
