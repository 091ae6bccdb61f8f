//! Cleanup Tasks
//!
//! Background loops that bound memory: the cache sweep drops expired entries
//! and the limiter cleanup drops idle buckets. Both stop when their
//! cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::limiter::RateLimiter;

/// Runs `work` every `interval` until `shutdown` is cancelled.
///
/// The first run happens one full interval after spawning.
fn spawn_periodic<F>(
    name: &'static str,
    interval: Duration,
    shutdown: CancellationToken,
    mut work: F,
) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    tokio::spawn(async move {
        info!(task = name, interval_secs = interval.as_secs_f64(), "Background task started");

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => work(),
                _ = shutdown.cancelled() => {
                    info!(task = name, "Background task shutting down");
                    break;
                }
            }
        }
    })
}

/// Spawns the periodic sweep of expired cache entries.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(TtlCache::new(Duration::from_secs(300))?);
/// let shutdown = CancellationToken::new();
/// let handle = spawn_cache_sweep_task(cache.clone(), Duration::from_secs(60), shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn spawn_cache_sweep_task<V>(
    cache: Arc<TtlCache<V>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    spawn_periodic("cache_sweep", interval, shutdown, move || {
        let removed = cache.sweep_expired();

        if removed > 0 {
            info!("Cache sweep: removed {} expired entries", removed);
        } else {
            debug!("Cache sweep: no expired entries found");
        }
    })
}

/// Spawns the periodic eviction of idle rate limiter buckets.
pub fn spawn_limiter_cleanup_task(
    limiter: Arc<RateLimiter>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    spawn_periodic("limiter_cleanup", interval, shutdown, move || {
        let evicted = limiter.cleanup_idle();

        if evicted > 0 {
            info!(tier = limiter.name(), "Limiter cleanup: evicted {} idle buckets", evicted);
        } else {
            debug!(tier = limiter.name(), "Limiter cleanup: no idle buckets found");
        }
    })
}
