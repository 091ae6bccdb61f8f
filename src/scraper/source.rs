//! Stats sources
//!
//! The scraping collaborator is opaque to the rest of the service: anything
//! that can produce a `ReadingStats` snapshot for a username.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::scraper::ReadingStats;

// == Source Error ==
#[derive(Error, Debug)]
pub enum SourceError {
    /// No data exists for the user
    #[error("no reading data for user '{0}'")]
    UserNotFound(String),

    /// The upstream could not be reached or returned garbage
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

// == Stats Source ==
/// Produces reading statistics for a user.
///
/// Implementations may be slow; callers must not hold locks across the call.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn reading_stats(&self, username: &str) -> Result<ReadingStats, SourceError>;
}

// == Snapshot Source ==
/// Serves pre-collected snapshots keyed by username.
#[derive(Debug, Default, Clone)]
pub struct SnapshotSource {
    snapshots: HashMap<String, ReadingStats>,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the snapshot for `stats.username`.
    pub fn with(mut self, stats: ReadingStats) -> Self {
        self.snapshots.insert(stats.username.clone(), stats);
        self
    }

    /// Loads snapshots from a JSON array of `ReadingStats`.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let list: Vec<ReadingStats> = serde_json::from_str(&raw)?;

        info!("Loaded {} reading snapshots from {}", list.len(), path.display());
        Ok(list.into_iter().fold(Self::new(), Self::with))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[async_trait]
impl StatsSource for SnapshotSource {
    async fn reading_stats(&self, username: &str) -> Result<ReadingStats, SourceError> {
        self.snapshots
            .get(username)
            .cloned()
            .ok_or_else(|| SourceError::UserNotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::io::Write;

    fn stats(username: &str) -> ReadingStats {
        ReadingStats {
            user_id: format!("1-{username}"),
            username: username.to_string(),
            total_books: 12,
            books_this_year: 3,
            currently_reading: 1,
            average_rating: 4.2,
            total_ratings: 10,
            total_reviews: 2,
            last_updated: Utc::now(),
            recent_reads: vec![],
            favorites: vec![],
            study_books: vec![],
        }
    }

    #[tokio::test]
    async fn test_snapshot_source_lookup() {
        let source = SnapshotSource::new().with(stats("alice"));

        let found = source.reading_stats("alice").await.unwrap();
        assert_eq!(found.total_books, 12);

        let missing = source.reading_stats("bob").await;
        assert!(matches!(missing, Err(SourceError::UserNotFound(ref u)) if u == "bob"));
    }

    #[tokio::test]
    async fn test_snapshot_source_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = serde_json::to_string(&vec![stats("alice"), stats("carol")]).unwrap();
        file.write_all(body.as_bytes()).unwrap();

        let source = SnapshotSource::from_file(file.path()).unwrap();
        assert_eq!(source.len(), 2);
        assert!(source.reading_stats("carol").await.is_ok());
    }

    #[test]
    fn test_snapshot_source_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        assert!(SnapshotSource::from_file(file.path()).is_err());
    }
}
