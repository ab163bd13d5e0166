//! Persisted record types.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A series known from the vendor catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SeriesRecord {
    /// Vendor series identifier.
    pub series_id: i64,
    /// Display title.
    pub title: String,
    /// Folder-safe name derived from the title.
    pub slug: String,
}

impl SeriesRecord {
    /// Builds a record, deriving the slug from the title.
    #[must_use]
    pub fn from_title(series_id: i64, title: &str) -> Self {
        Self {
            series_id,
            title: title.to_string(),
            slug: crate::layout::slugify(title),
        }
    }
}

/// A series the user wants synchronized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WatchEntry {
    /// Generated row id, referenced by ledger rows.
    pub id: i64,
    /// Vendor series identifier (unique).
    pub series_id: i64,
    /// Display title.
    pub title: String,
    /// Folder name used under the data directory.
    pub slug: String,
}

/// One row of the download ledger.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LedgerEntry {
    /// Generated row id.
    pub id: i64,
    /// Watch entry the chapter was downloaded for.
    #[sqlx(rename = "watching_id")]
    pub watch_id: i64,
    /// Vendor series identifier.
    pub series_id: i64,
    /// Chapter label as reported by the catalog.
    pub chapter_label: String,
}

/// Outcome of a watch-list upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchUpsert {
    /// A new watch entry was created.
    Inserted(i64),
    /// An existing entry for the series was refreshed in place.
    Updated(i64),
}

impl WatchUpsert {
    /// Returns the watch entry id regardless of outcome.
    #[must_use]
    pub fn id(self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Updated(id) => id,
        }
    }
}

/// A watch entry together with its ledger size, for listings.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct WatchSummary {
    /// Generated row id.
    pub id: i64,
    /// Vendor series identifier.
    pub series_id: i64,
    /// Display title.
    pub title: String,
    /// Number of ledger rows for this entry.
    pub downloaded: i64,
}
