//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired cache entries
//! - Limiter cleanup: evicts idle token buckets

mod cleanup;

pub use cleanup::{spawn_cache_sweep_task, spawn_limiter_cleanup_task};
