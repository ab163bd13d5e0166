//! Repository seam for state persistence.
//!
//! The sync engine, watch-list and discovery flows depend on this trait rather
//! than on [`Store`] directly, so a different backing store can be swapped in.

use async_trait::async_trait;

use super::{Result, SeriesRecord, Store, WatchEntry, WatchUpsert};

/// Data-access contract used by the synchronization flows.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Inserts or refreshes a known series.
    async fn upsert_series(&self, record: &SeriesRecord) -> Result<()>;

    /// Looks up a known series.
    async fn get_series(&self, series_id: i64) -> Result<Option<SeriesRecord>>;

    /// Highest known series id.
    async fn max_series_id(&self) -> Result<Option<i64>>;

    /// Upserts a watch entry keyed by series id.
    async fn upsert_watch(&self, record: &SeriesRecord) -> Result<WatchUpsert>;

    /// Lists watch entries, filtered when `series_ids` is non-empty.
    async fn list_watch(&self, series_ids: &[i64]) -> Result<Vec<WatchEntry>>;

    /// Labels already in the ledger for a watch relationship.
    async fn downloaded_labels(&self, watch_id: i64, series_id: i64) -> Result<Vec<String>>;

    /// Writes a ledger row; `false` when it already existed.
    async fn record_download(
        &self,
        watch_id: i64,
        series_id: i64,
        chapter_label: &str,
    ) -> Result<bool>;
}

#[async_trait]
impl StateRepository for Store {
    async fn upsert_series(&self, record: &SeriesRecord) -> Result<()> {
        Store::upsert_series(self, record).await
    }

    async fn get_series(&self, series_id: i64) -> Result<Option<SeriesRecord>> {
        Store::get_series(self, series_id).await
    }

    async fn max_series_id(&self) -> Result<Option<i64>> {
        Store::max_series_id(self).await
    }

    async fn upsert_watch(&self, record: &SeriesRecord) -> Result<WatchUpsert> {
        Store::upsert_watch(self, record).await
    }

    async fn list_watch(&self, series_ids: &[i64]) -> Result<Vec<WatchEntry>> {
        Store::list_watch(self, series_ids).await
    }

    async fn downloaded_labels(&self, watch_id: i64, series_id: i64) -> Result<Vec<String>> {
        Store::downloaded_labels(self, watch_id, series_id).await
    }

    async fn record_download(
        &self,
        watch_id: i64,
        series_id: i64,
        chapter_label: &str,
    ) -> Result<bool> {
        Store::record_download(self, watch_id, series_id, chapter_label).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Database;

    async fn watched_count(repo: &impl StateRepository) -> usize {
        repo.list_watch(&[]).await.unwrap().len()
    }

    #[tokio::test]
    async fn test_state_repository_trait_delegates_to_store() {
        let store = Store::new(Database::new_in_memory().await.unwrap());
        let record = SeriesRecord::from_title(9, "Nine");

        StateRepository::upsert_series(&store, &record).await.unwrap();
        let found = StateRepository::get_series(&store, 9).await.unwrap();
        assert_eq!(found, Some(record.clone()));

        let watch = StateRepository::upsert_watch(&store, &record).await.unwrap();
        assert_eq!(watched_count(&store).await, 1);

        assert!(
            StateRepository::record_download(&store, watch.id(), 9, "1")
                .await
                .unwrap()
        );
        let labels = StateRepository::downloaded_labels(&store, watch.id(), 9)
            .await
            .unwrap();
        assert_eq!(labels, vec!["1".to_string()]);
    }
}
