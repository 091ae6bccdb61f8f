//! Response DTOs for the reading stats API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::scraper::{Book, ReadingStats};

/// Response body for the favorites endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FavoritesResponse {
    pub username: String,
    pub favorites: Vec<Book>,
    pub count: usize,
}

impl FavoritesResponse {
    pub fn new(username: impl Into<String>, favorites: Vec<Book>) -> Self {
        Self {
            username: username.into(),
            count: favorites.len(),
            favorites,
        }
    }
}

/// Response body for the study shelf endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StudyBooksResponse {
    pub username: String,
    pub study_books: Vec<Book>,
    pub count: usize,
}

impl StudyBooksResponse {
    pub fn new(username: impl Into<String>, study_books: Vec<Book>) -> Self {
        Self {
            username: username.into(),
            count: study_books.len(),
            study_books,
        }
    }
}

/// Headline numbers shown on a portfolio page
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioStats {
    pub total_ratings: u32,
    pub total_reviews: u32,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookCount {
    pub favorites: usize,
    pub study: usize,
}

/// Response body for the portfolio endpoint, a trimmed view of `ReadingStats`
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioResponse {
    pub username: String,
    pub stats: PortfolioStats,
    pub favorite_books: Vec<Book>,
    pub book_count: BookCount,
    pub last_updated: DateTime<Utc>,
}

impl From<ReadingStats> for PortfolioResponse {
    fn from(stats: ReadingStats) -> Self {
        Self {
            book_count: BookCount {
                favorites: stats.favorites.len(),
                study: stats.study_books.len(),
            },
            stats: PortfolioStats {
                total_ratings: stats.total_ratings,
                total_reviews: stats.total_reviews,
                average_rating: stats.average_rating,
            },
            username: stats.username,
            favorite_books: stats.favorites,
            last_updated: stats.last_updated,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Cache population snapshot
    pub cache: CacheStats,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache: CacheStats) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            cache,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description
    pub message: String,
    /// Seconds to wait before retrying, on rate limit denials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after = Some(secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ReadingStats {
        ReadingStats {
            user_id: "7-dana".to_string(),
            username: "dana".to_string(),
            total_books: 40,
            books_this_year: 8,
            currently_reading: 2,
            average_rating: 3.9,
            total_ratings: 35,
            total_reviews: 6,
            last_updated: Utc::now(),
            recent_reads: vec![Book::new("Emma", "Jane Austen")],
            favorites: vec![Book::new("Dune", "Frank Herbert")],
            study_books: vec![
                Book::new("SICP", "Abelson"),
                Book::new("TAOCP", "Knuth"),
            ],
        }
    }

    #[test]
    fn test_portfolio_from_stats() {
        let portfolio = PortfolioResponse::from(stats());

        assert_eq!(portfolio.username, "dana");
        assert_eq!(portfolio.stats.total_ratings, 35);
        assert_eq!(portfolio.book_count.favorites, 1);
        assert_eq!(portfolio.book_count.study, 2);
        assert_eq!(portfolio.favorite_books[0].title, "Dune");
    }

    #[test]
    fn test_favorites_count() {
        let response = FavoritesResponse::new("dana", stats().favorites);
        assert_eq!(response.count, 1);
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse::healthy(CacheStats::new(2, 1));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["cache"]["active"], 1);
        assert!(json["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_error_response_omits_retry_after() {
        let json = serde_json::to_value(ErrorResponse::new("scraping_failed", "boom")).unwrap();
        assert!(json.get("retry_after").is_none());

        let json = serde_json::to_value(
            ErrorResponse::new("rate_limit_exceeded", "slow down").with_retry_after(60),
        )
        .unwrap();
        assert_eq!(json["retry_after"], 60);
    }
}
