//! API Module
//!
//! HTTP handlers, rate limiting middleware and routing for the REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /api/v1/reading-stats/:username` - Reading statistics
//! - `GET /api/v1/reading-stats/:username/favorites` - Favorite books
//! - `GET /api/v1/reading-stats/:username/study` - Study shelf
//! - `GET /api/v1/portfolio/:username` - Portfolio summary

pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
