//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::limiter::RateLimitConfig;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for cached responses
    pub cache_ttl: u64,
    /// Cache sweep interval in seconds
    pub sweep_interval: u64,
    /// General tier: requests per minute per client
    pub rate_limit_per_minute: u32,
    /// Scrape tier: requests per minute per client
    pub scrape_rate_limit: u32,
    /// Idle bucket cleanup interval in seconds
    pub limiter_cleanup_interval: u64,
    /// Peers allowed to supply the client address via `X-Forwarded-For`
    pub trusted_proxies: Vec<IpAddr>,
    /// JSON file of reading snapshots served by the bundled source
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 21600)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `RATE_LIMIT_PER_MINUTE` - General tier quota (default: 60)
    /// - `SCRAPE_RATE_LIMIT` - Scrape tier quota (default: 10)
    /// - `LIMITER_CLEANUP_INTERVAL` - Idle bucket cleanup in seconds (default: 300)
    /// - `TRUSTED_PROXIES` - Comma-separated IPs (default: 127.0.0.1,::1)
    /// - `SNAPSHOT_PATH` - Reading snapshot file (default: unset)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let trusted_proxies = match env::var("TRUSTED_PROXIES") {
            Ok(raw) => parse_proxies(&raw)?,
            Err(_) => defaults.trusted_proxies,
        };

        let config = Self {
            server_port: env_or("SERVER_PORT", defaults.server_port)?,
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl)?,
            sweep_interval: env_or("CACHE_SWEEP_INTERVAL", defaults.sweep_interval)?,
            rate_limit_per_minute: env_or("RATE_LIMIT_PER_MINUTE", defaults.rate_limit_per_minute)?,
            scrape_rate_limit: env_or("SCRAPE_RATE_LIMIT", defaults.scrape_rate_limit)?,
            limiter_cleanup_interval: env_or(
                "LIMITER_CLEANUP_INTERVAL",
                defaults.limiter_cleanup_interval,
            )?,
            trusted_proxies,
            snapshot_path: env::var("SNAPSHOT_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the governance components cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl == 0 {
            return Err(ConfigError::ZeroDuration("CACHE_TTL"));
        }
        if self.sweep_interval == 0 {
            return Err(ConfigError::ZeroDuration("CACHE_SWEEP_INTERVAL"));
        }
        if self.limiter_cleanup_interval == 0 {
            return Err(ConfigError::ZeroDuration("LIMITER_CLEANUP_INTERVAL"));
        }
        if self.rate_limit_per_minute == 0 {
            return Err(ConfigError::ZeroCapacity("RATE_LIMIT_PER_MINUTE"));
        }
        if self.scrape_rate_limit == 0 {
            return Err(ConfigError::ZeroCapacity("SCRAPE_RATE_LIMIT"));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn limiter_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.limiter_cleanup_interval)
    }

    pub fn general_limit(&self) -> RateLimitConfig {
        RateLimitConfig::per_minute(self.rate_limit_per_minute)
    }

    pub fn scrape_limit(&self) -> RateLimitConfig {
        RateLimitConfig::per_minute(self.scrape_rate_limit)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cache_ttl: 6 * 60 * 60,
            sweep_interval: 60,
            rate_limit_per_minute: 60,
            scrape_rate_limit: 10,
            limiter_cleanup_interval: 300,
            trusted_proxies: vec![
                IpAddr::from([127, 0, 0, 1]),
                IpAddr::from([0, 0, 0, 0, 0, 0, 0, 1]),
            ],
            snapshot_path: None,
        }
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    parse_or(name, env::var(name).ok(), default)
}

/// Unset or blank falls back to `default`; anything else must parse.
fn parse_or<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

fn parse_proxies(raw: &str) -> Result<Vec<IpAddr>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse().map_err(|_| ConfigError::Invalid {
                name: "TRUSTED_PROXIES",
                value: s.to_string(),
            })
        })
        .collect()
}
