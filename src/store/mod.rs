//! State store for known series, the watchlist and the download ledger.
//!
//! Every operation is a single auto-committing statement. The ledger insert
//! is idempotent (`ON CONFLICT DO NOTHING`), so re-recording a chapter that is
//! already owned never fails and never duplicates.
//!
//! # Example
//!
//! ```ignore
//! use chapter_sync_core::{Database, Store, SeriesRecord};
//! use std::path::Path;
//!
//! let db = Database::new(Path::new("chapters.db")).await?;
//! let store = Store::new(db);
//!
//! store.upsert_series(&SeriesRecord::from_title(100, "Some Series")).await?;
//! let watch = store.upsert_watch(&store.get_series(100).await?.unwrap()).await?;
//! store.record_download(watch.id(), 100, "1").await?;
//! ```

mod error;
mod models;
mod repository;

pub use error::{StoreDbErrorKind, StoreError};
pub use models::{LedgerEntry, SeriesRecord, WatchEntry, WatchSummary, WatchUpsert};
pub use repository::StateRepository;

use sqlx::{QueryBuilder, Sqlite};
use tracing::instrument;

use crate::db::Database;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// SQLite-backed state store.
#[derive(Debug, Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    /// Creates a store over the given database connection.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ==================== Known series ====================

    /// Inserts or refreshes a known series. On id collision the title and
    /// slug are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the statement fails.
    #[instrument(skip(self, record), fields(series_id = record.series_id))]
    pub async fn upsert_series(&self, record: &SeriesRecord) -> Result<()> {
        sqlx::query(
            r"INSERT INTO series (series_id, title, slug)
              VALUES (?, ?, ?)
              ON CONFLICT (series_id) DO UPDATE SET
                  title = excluded.title,
                  slug = excluded.slug,
                  updated_at = datetime('now')",
        )
        .bind(record.series_id)
        .bind(&record.title)
        .bind(&record.slug)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Looks up a known series by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn get_series(&self, series_id: i64) -> Result<Option<SeriesRecord>> {
        let record = sqlx::query_as::<_, SeriesRecord>(
            r"SELECT series_id, title, slug FROM series WHERE series_id = ?",
        )
        .bind(series_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(record)
    }

    /// Highest known series id, used as the discovery resume point.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn max_series_id(&self) -> Result<Option<i64>> {
        let (max,): (Option<i64>,) = sqlx::query_as(r"SELECT MAX(series_id) FROM series")
            .fetch_one(self.db.pool())
            .await?;

        Ok(max)
    }

    // ==================== Watchlist ====================

    /// Adds a series to the watchlist, or refreshes the stored linkage
    /// fields when it is already watched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the statement fails.
    #[instrument(skip(self, record), fields(series_id = record.series_id))]
    pub async fn upsert_watch(&self, record: &SeriesRecord) -> Result<WatchUpsert> {
        let existing = self.get_watch_by_series(record.series_id).await?;

        let (id,): (i64,) = sqlx::query_as(
            r"INSERT INTO watching (series_id, title, slug)
              VALUES (?, ?, ?)
              ON CONFLICT (series_id) DO UPDATE SET
                  title = excluded.title,
                  slug = excluded.slug
              RETURNING id",
        )
        .bind(record.series_id)
        .bind(&record.title)
        .bind(&record.slug)
        .fetch_one(self.db.pool())
        .await?;

        Ok(if existing.is_some() {
            WatchUpsert::Updated(id)
        } else {
            WatchUpsert::Inserted(id)
        })
    }

    /// Looks up the watch entry for a series.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn get_watch_by_series(&self, series_id: i64) -> Result<Option<WatchEntry>> {
        let entry = sqlx::query_as::<_, WatchEntry>(
            r"SELECT id, series_id, title, slug FROM watching WHERE series_id = ?",
        )
        .bind(series_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(entry)
    }

    /// Lists watch entries, restricted to `series_ids` when non-empty.
    ///
    /// Entries come back in insertion order so runs are deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self), fields(filter = series_ids.len()))]
    pub async fn list_watch(&self, series_ids: &[i64]) -> Result<Vec<WatchEntry>> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, series_id, title, slug FROM watching");

        if !series_ids.is_empty() {
            builder.push(" WHERE series_id IN (");
            let mut separated = builder.separated(", ");
            for series_id in series_ids {
                separated.push_bind(*series_id);
            }
            separated.push_unseparated(")");
        }
        builder.push(" ORDER BY id ASC");

        let entries = builder
            .build_query_as::<WatchEntry>()
            .fetch_all(self.db.pool())
            .await?;

        Ok(entries)
    }

    /// Lists watch entries with the number of downloaded chapters each.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_watch_summaries(&self) -> Result<Vec<WatchSummary>> {
        let rows = sqlx::query_as::<_, WatchSummary>(
            r"SELECT w.id, w.series_id, w.title, COUNT(d.id) AS downloaded
              FROM watching w
              LEFT JOIN downloaded d ON d.watching_id = w.id
              GROUP BY w.id
              ORDER BY w.id ASC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    // ==================== Ledger ====================

    /// Returns the labels already downloaded for a watch relationship.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn downloaded_labels(&self, watch_id: i64, series_id: i64) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r"SELECT chapter_label FROM downloaded
              WHERE watching_id = ? AND series_id = ?
              ORDER BY id ASC",
        )
        .bind(watch_id)
        .bind(series_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|(label,)| label).collect())
    }

    /// Records a downloaded chapter.
    ///
    /// Returns `true` when a new ledger row was written and `false` when the
    /// chapter was already recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the insert fails (for example when
    /// `watch_id` does not reference a watch entry).
    #[instrument(skip(self))]
    pub async fn record_download(
        &self,
        watch_id: i64,
        series_id: i64,
        chapter_label: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r"INSERT INTO downloaded (watching_id, series_id, chapter_label)
              VALUES (?, ?, ?)
              ON CONFLICT (watching_id, series_id, chapter_label) DO NOTHING",
        )
        .bind(watch_id)
        .bind(series_id)
        .bind(chapter_label)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns every ledger row for a series, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn ledger_for_series(&self, series_id: i64) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerEntry>(
            r"SELECT id, watching_id, series_id, chapter_label FROM downloaded
              WHERE series_id = ?
              ORDER BY id ASC",
        )
        .bind(series_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }
}
