//! API Handlers
//!
//! HTTP request handlers for each endpoint. Every reading-stats handler goes
//! through the shared cache: a hit answers immediately, a miss calls the
//! stats source and stores the result.

use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::cache::{cache_key, TtlCache};
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};
use crate::limiter::RateLimiter;
use crate::models::{
    FavoritesResponse, HealthResponse, PortfolioResponse, StudyBooksResponse, Username,
};
use crate::scraper::{ReadingStats, StatsSource};

/// Response header reporting whether the body came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Application state shared across all handlers.
///
/// Built once by the composition root; every field is a shared handle, so
/// cloning the state is cheap and all clones see the same cache and limiters.
#[derive(Clone)]
pub struct AppState {
    /// Cached response bodies keyed by `<kind>:<username>`
    pub cache: Arc<TtlCache<Value>>,
    /// Permissive tier for all API routes
    pub general_limiter: Arc<RateLimiter>,
    /// Strict tier for routes that may scrape
    pub scrape_limiter: Arc<RateLimiter>,
    /// Scraping collaborator
    pub source: Arc<dyn StatsSource>,
    /// Peers whose forwarded client address is trusted
    pub trusted_proxies: Arc<[IpAddr]>,
}

impl AppState {
    /// Creates a new AppState from already constructed components.
    pub fn new(
        cache: Arc<TtlCache<Value>>,
        general_limiter: Arc<RateLimiter>,
        scrape_limiter: Arc<RateLimiter>,
        source: Arc<dyn StatsSource>,
    ) -> Self {
        Self {
            cache,
            general_limiter,
            scrape_limiter,
            source,
            trusted_proxies: Arc::from(Vec::new()),
        }
    }

    pub fn with_trusted_proxies(mut self, proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = Arc::from(proxies);
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails if the cache TTL or either tier's quota is invalid.
    pub fn from_config(
        config: &Config,
        source: Arc<dyn StatsSource>,
    ) -> std::result::Result<Self, ConfigError> {
        let cache = TtlCache::new(config.cache_ttl())?;
        let general = RateLimiter::new("general", config.general_limit())?;
        let scrape = RateLimiter::new("scrape", config.scrape_limit())?;

        Ok(
            Self::new(Arc::new(cache), Arc::new(general), Arc::new(scrape), source)
                .with_trusted_proxies(config.trusted_proxies.clone()),
        )
    }
}

// == Cache Helpers ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

fn cached_response(status: CacheStatus, body: Value) -> Response {
    ([(CACHE_STATUS_HEADER, status.as_str())], Json(body)).into_response()
}

/// Serves `key` from the cache, or builds, stores and serves it.
///
/// No lock is held while `build` runs.
async fn serve_cached<F, Fut>(state: &AppState, key: String, build: F) -> Result<Response>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    if let Some(body) = state.cache.get(&key) {
        return Ok(cached_response(CacheStatus::Hit, body));
    }

    let body = build().await?;
    state.cache.set(key, body.clone());
    Ok(cached_response(CacheStatus::Miss, body))
}

/// Calls the source, logging failures.
async fn scrape(state: &AppState, username: &Username) -> Result<ReadingStats> {
    state
        .source
        .reading_stats(username.as_str())
        .await
        .map_err(|err| {
            warn!(username = username.as_str(), error = %err, "Reading stats lookup failed");
            ApiError::from(err)
        })
}

/// Full stats for `username`, reusing the cached `stats:` entry when present.
async fn load_stats(state: &AppState, username: &Username) -> Result<ReadingStats> {
    let key = cache_key("stats", username.as_str());

    if let Some(cached) = state.cache.get(&key) {
        if let Ok(stats) = serde_json::from_value(cached) {
            return Ok(stats);
        }
    }

    let stats = scrape(state, username).await?;
    state.cache.set(key, serde_json::to_value(&stats)?);
    Ok(stats)
}

fn parse_username(raw: String) -> Result<Username> {
    Username::parse(raw).map_err(ApiError::InvalidUsername)
}

/// Handler for GET /api/v1/reading-stats/:username
pub async fn reading_stats_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response> {
    let username = parse_username(username)?;
    let key = cache_key("stats", username.as_str());

    serve_cached(&state, key, || async {
        let stats = scrape(&state, &username).await?;
        Ok::<_, ApiError>(serde_json::to_value(stats)?)
    })
    .await
}

/// Handler for GET /api/v1/reading-stats/:username/favorites
pub async fn favorites_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response> {
    let username = parse_username(username)?;
    let key = cache_key("favorites", username.as_str());

    serve_cached(&state, key, || async {
        let stats = load_stats(&state, &username).await?;
        let body = FavoritesResponse::new(username.as_str(), stats.favorites);
        Ok::<_, ApiError>(serde_json::to_value(body)?)
    })
    .await
}

/// Handler for GET /api/v1/reading-stats/:username/study
pub async fn study_books_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response> {
    let username = parse_username(username)?;
    let key = cache_key("study", username.as_str());

    serve_cached(&state, key, || async {
        let stats = load_stats(&state, &username).await?;
        let body = StudyBooksResponse::new(username.as_str(), stats.study_books);
        Ok::<_, ApiError>(serde_json::to_value(body)?)
    })
    .await
}

/// Handler for GET /api/v1/portfolio/:username
pub async fn portfolio_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response> {
    let username = parse_username(username)?;
    let key = cache_key("portfolio", username.as_str());

    serve_cached(&state, key, || async {
        let stats = load_stats(&state, &username).await?;
        Ok::<_, ApiError>(serde_json::to_value(PortfolioResponse::from(stats))?)
    })
    .await
}

/// Handler for GET /health
///
/// Reports cache population alongside the health status.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.stats()))
}
