//! Reading statistics models
//!
//! The snapshot a source produces for one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete reading statistics for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingStats {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub total_books: u32,
    #[serde(default)]
    pub books_this_year: u32,
    #[serde(default)]
    pub currently_reading: u32,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub total_reviews: u32,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub recent_reads: Vec<Book>,
    #[serde(default)]
    pub favorites: Vec<Book>,
    #[serde(default)]
    pub study_books: Vec<Book>,
}

/// A book with its shelf metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    /// Star rating, 1-5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_read: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goodreads_url: Option<String>,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            rating: None,
            date_read: None,
            cover_url: None,
            goodreads_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_omits_empty_fields() {
        let json = serde_json::to_value(Book::new("Dune", "Frank Herbert")).unwrap();
        assert_eq!(json["title"], "Dune");
        assert!(json.get("rating").is_none());
        assert!(json.get("cover_url").is_none());
    }

    #[test]
    fn test_stats_deserialize_with_defaults() {
        let json = r#"{
            "user_id": "42-alice",
            "username": "alice",
            "last_updated": "2024-05-01T12:00:00Z",
            "favorites": [{"title": "Dune", "author": "Frank Herbert", "rating": 5}]
        }"#;
        let stats: ReadingStats = serde_json::from_str(json).unwrap();

        assert_eq!(stats.username, "alice");
        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.favorites.len(), 1);
        assert_eq!(stats.favorites[0].rating, Some(5));
        assert!(stats.study_books.is_empty());
    }
}
