//! Rate limiting middleware
//!
//! Consults a tier's limiter before the handler runs. A denial returns 429
//! immediately, so neither the cache nor the source is touched.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::identity::client_identity;
use super::AppState;
use crate::error::{ApiError, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER};
use crate::limiter::RateLimiter;

/// Denial details for one tier.
struct Tier<'a> {
    limiter: &'a RateLimiter,
    code: &'static str,
    message: &'static str,
}

/// General tier, applied to every `/api/v1` route.
pub async fn general_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let tier = Tier {
        limiter: &state.general_limiter,
        code: "rate_limit_exceeded",
        message: "Too many requests. Please try again later.",
    };
    enforce(tier, &state, req, next).await
}

/// Stricter tier for routes that may reach the scraping source.
pub async fn scrape_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let tier = Tier {
        limiter: &state.scrape_limiter,
        code: "scrape_rate_limit_exceeded",
        message: "Scraping rate limit exceeded. Please wait before making more requests.",
    };
    enforce(tier, &state, req, next).await
}

async fn enforce(tier: Tier<'_>, state: &AppState, req: Request, next: Next) -> Response {
    let identity = client_identity(&req, &state.trusted_proxies);

    if !tier.limiter.allow(&identity) {
        return ApiError::RateLimited {
            code: tier.code,
            message: tier.message,
            limit: tier.limiter.limit(),
        }
        .into_response();
    }

    let limit = tier.limiter.limit();
    let remaining = tier.limiter.remaining(&identity);

    let mut response = next.run(req).await;

    // An inner tier has already reported its own, tighter quota.
    let headers = response.headers_mut();
    if !headers.contains_key(RATE_LIMIT_LIMIT_HEADER) {
        headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(limit));
        headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(remaining));
    }

    response
}
