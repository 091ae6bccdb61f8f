//! API Routes
//!
//! Configures the Axum router with all endpoints and the rate limiting tiers.

use axum::{
    http::{header, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    favorites_handler, health_handler, portfolio_handler, reading_stats_handler,
    study_books_handler, AppState,
};
use super::middleware::{general_rate_limit, scrape_rate_limit};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check with cache statistics
/// - `GET /api/v1/reading-stats/:username` - Full reading statistics
/// - `GET /api/v1/reading-stats/:username/favorites` - Favorite books
/// - `GET /api/v1/reading-stats/:username/study` - Study shelf
/// - `GET /api/v1/portfolio/:username` - Portfolio summary
///
/// # Middleware
/// - General rate limit on every `/api/v1` route, scrape rate limit inside it
/// - CORS: any origin, GET and OPTIONS
/// - Tracing: logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let scrape_routes = Router::new()
        .route("/reading-stats/:username", get(reading_stats_handler))
        .route("/reading-stats/:username/favorites", get(favorites_handler))
        .route("/reading-stats/:username/study", get(study_books_handler))
        .route("/portfolio/:username", get(portfolio_handler))
        .route_layer(from_fn_with_state(state.clone(), scrape_rate_limit));

    let api = Router::new()
        .merge(scrape_routes)
        .route_layer(from_fn_with_state(state.clone(), general_rate_limit));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::cache::TtlCache;
    use crate::limiter::{RateLimitConfig, RateLimiter};
    use crate::scraper::SnapshotSource;

    fn create_test_app(scrape_capacity: u32) -> Router {
        let state = AppState::new(
            Arc::new(TtlCache::new(Duration::from_secs(300)).unwrap()),
            Arc::new(RateLimiter::new("general", RateLimitConfig::per_minute(100)).unwrap()),
            Arc::new(
                RateLimiter::new("scrape", RateLimitConfig::per_minute(scrape_capacity)).unwrap(),
            ),
            Arc::new(SnapshotSource::new()),
        );
        create_router(state)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app(10);

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-ratelimit-limit").is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let app = create_test_app(10);

        let response = app
            .oneshot(get_request("/api/v1/reading-stats/nobody"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-ratelimit-limit"], "10");
    }

    #[tokio::test]
    async fn test_scrape_tier_denies_after_quota() {
        let app = create_test_app(1);

        let first = app
            .clone()
            .oneshot(get_request("/api/v1/portfolio/nobody"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::NOT_FOUND);

        let second = app
            .oneshot(get_request("/api/v1/portfolio/nobody"))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(second.headers()["retry-after"], "60");
    }

    #[tokio::test]
    async fn test_unrouted_path() {
        let app = create_test_app(10);

        let response = app.oneshot(get_request("/api/v1/unknown")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
