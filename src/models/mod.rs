//! Request and Response models for the reading stats API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! validating inputs and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::Username;
pub use responses::{
    BookCount, ErrorResponse, FavoritesResponse, HealthResponse, PortfolioResponse,
    PortfolioStats, StudyBooksResponse,
};
