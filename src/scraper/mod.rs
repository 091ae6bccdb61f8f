//! Scraper Module
//!
//! Reading statistics models and the sources that produce them.

mod models;
mod source;

pub use models::{Book, ReadingStats};
pub use source::{SnapshotSource, SourceError, StatsSource};
