//! Reading Stats - a reading statistics API
//!
//! Serves per-user reading statistics behind a shared TTL cache and
//! per-client token-bucket rate limiting.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reading_stats::scraper::{SnapshotSource, StatsSource};
use reading_stats::{
    create_router, spawn_cache_sweep_task, spawn_limiter_cleanup_task, AppState, Config,
};

/// Main entry point for the reading stats server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Build the cache, both rate limiters and the stats source
/// 4. Start the cache sweep and limiter cleanup tasks
/// 5. Serve HTTP until SIGINT/SIGTERM, then stop the background tasks
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reading_stats=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Reading Stats Server");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: cache_ttl={}s, sweep_interval={}s, general_limit={}/min, scrape_limit={}/min, port={}",
        config.cache_ttl,
        config.sweep_interval,
        config.rate_limit_per_minute,
        config.scrape_rate_limit,
        config.server_port
    );

    let source: Arc<dyn StatsSource> = match &config.snapshot_path {
        Some(path) => Arc::new(
            SnapshotSource::from_file(path)
                .with_context(|| format!("failed to load snapshots from {}", path.display()))?,
        ),
        None => Arc::new(SnapshotSource::new()),
    };

    let state = AppState::from_config(&config, source).context("invalid configuration")?;

    let shutdown = CancellationToken::new();
    let tasks = vec![
        spawn_cache_sweep_task(state.cache.clone(), config.sweep_interval(), shutdown.clone()),
        spawn_limiter_cleanup_task(
            state.general_limiter.clone(),
            config.limiter_cleanup_interval(),
            shutdown.clone(),
        ),
        spawn_limiter_cleanup_task(
            state.scrape_limiter.clone(),
            config.limiter_cleanup_interval(),
            shutdown.clone(),
        ),
    ];
    info!("Background tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
    .await
    .context("server error")?;

    for task in tasks {
        task.await.context("background task panicked")?;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then cancels background tasks.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    shutdown.cancel();
}
