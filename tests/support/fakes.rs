//! In-memory stand-ins for the vendor API, the archive host and the store.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chapter_sync_core::{
    ApiError, ArchiveFetcher, ArchiveLocation, ArchiveLocator, CatalogSource, ChapterListing,
    ChapterRecord, DownloadError, SeriesRecord, StateRepository, Store, StoreDbErrorKind,
    StoreError, UnpackSummary, WatchEntry, WatchUpsert,
};
use tokio::time::Instant;

pub fn chapter(label: &str, ts: i64) -> ChapterRecord {
    ChapterRecord {
        chapter_id: format!("cid-{label}"),
        label: label.to_string(),
        publication_timestamp: ts,
        is_published: true,
        price: String::new(),
        series_title: "Test Series".to_string(),
    }
}

/// Catalog keyed by series id; unknown ids return an empty listing.
#[derive(Default)]
pub struct FakeCatalog {
    listings: HashMap<i64, Vec<ChapterRecord>>,
    failing: HashSet<i64>,
}

impl FakeCatalog {
    pub fn with_series(mut self, series_id: i64, chapters: Vec<ChapterRecord>) -> Self {
        self.listings.insert(series_id, chapters);
        self
    }

    pub fn failing_for(mut self, series_id: i64) -> Self {
        self.failing.insert(series_id);
        self
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_catalog(&self, series_id: i64) -> Result<ChapterListing, ApiError> {
        if self.failing.contains(&series_id) {
            return Err(ApiError::http_status("/manga/store/series", 503));
        }
        Ok(ChapterListing {
            chapters: self.listings.get(&series_id).cloned().unwrap_or_default(),
        })
    }
}

/// Locator that hands out `fake://{chapter_id}` URLs until its quota runs out.
pub struct FakeLocator {
    quota: Mutex<Option<usize>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
    call_times: Mutex<Vec<Instant>>,
}

impl FakeLocator {
    pub fn unlimited() -> Self {
        Self {
            quota: Mutex::new(None),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            call_times: Mutex::new(Vec::new()),
        }
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Mutex::new(Some(quota)),
            ..Self::unlimited()
        }
    }

    pub fn failing_for(mut self, chapter_id: &str) -> Self {
        self.failing.insert(chapter_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Tokio clock readings taken at each lookup.
    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveLocator for FakeLocator {
    async fn fetch_download_location(&self, chapter_id: &str) -> Result<ArchiveLocation, ApiError> {
        self.calls.lock().unwrap().push(chapter_id.to_string());
        self.call_times.lock().unwrap().push(Instant::now());
        if self.failing.contains(chapter_id) {
            return Err(ApiError::decode("/manga/get_manga_url", "garbled"));
        }
        let mut quota = self.quota.lock().unwrap();
        match quota.as_mut() {
            Some(0) => Ok(ArchiveLocation::Denied),
            Some(remaining) => {
                *remaining -= 1;
                Ok(ArchiveLocation::Url(format!("fake://{chapter_id}")))
            }
            None => Ok(ArchiveLocation::Url(format!("fake://{chapter_id}"))),
        }
    }
}

/// Fetcher that writes a single `1.jpg` into the destination.
#[derive(Default)]
pub struct FakeFetcher {
    failing_urls: HashSet<String>,
    fetched: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeFetcher {
    pub fn failing_for(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<(String, PathBuf)> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveFetcher for FakeFetcher {
    async fn fetch_and_unpack(&self, url: &str, dest: &Path) -> Result<UnpackSummary, DownloadError> {
        if self.failing_urls.contains(url) {
            return Err(DownloadError::http_status(url, 502));
        }
        std::fs::create_dir_all(dest).map_err(|e| DownloadError::io(dest, e))?;
        let page = dest.join("1.jpg");
        std::fs::write(&page, url.as_bytes()).map_err(|e| DownloadError::io(&page, e))?;
        self.fetched
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        Ok(UnpackSummary {
            files: vec!["1.jpg".to_string()],
            skipped: 0,
        })
    }
}

/// Store wrapper whose ledger writes always fail.
pub struct BrokenLedger {
    pub inner: Arc<Store>,
}

#[async_trait]
impl StateRepository for BrokenLedger {
    async fn upsert_series(&self, record: &SeriesRecord) -> Result<(), StoreError> {
        self.inner.upsert_series(record).await
    }

    async fn get_series(&self, series_id: i64) -> Result<Option<SeriesRecord>, StoreError> {
        self.inner.get_series(series_id).await
    }

    async fn max_series_id(&self) -> Result<Option<i64>, StoreError> {
        self.inner.max_series_id().await
    }

    async fn upsert_watch(&self, record: &SeriesRecord) -> Result<WatchUpsert, StoreError> {
        self.inner.upsert_watch(record).await
    }

    async fn list_watch(&self, series_ids: &[i64]) -> Result<Vec<WatchEntry>, StoreError> {
        self.inner.list_watch(series_ids).await
    }

    async fn downloaded_labels(
        &self,
        watch_id: i64,
        series_id: i64,
    ) -> Result<Vec<String>, StoreError> {
        self.inner.downloaded_labels(watch_id, series_id).await
    }

    async fn record_download(
        &self,
        _watch_id: i64,
        _series_id: i64,
        _chapter_label: &str,
    ) -> Result<bool, StoreError> {
        Err(StoreError::Database {
            kind: StoreDbErrorKind::BusyOrLocked,
            message: "database is locked".to_string(),
        })
    }
}

/// Pure in-memory repository, for tests that run on a paused clock.
#[derive(Default)]
pub struct MemoryRepo {
    series: Mutex<Vec<SeriesRecord>>,
    watch: Mutex<Vec<WatchEntry>>,
    ledger: Mutex<Vec<(i64, i64, String)>>,
}

impl MemoryRepo {
    pub fn watching(series: &[(i64, &str)]) -> Self {
        let repo = Self::default();
        {
            let mut watch = repo.watch.lock().unwrap();
            for (index, (series_id, title)) in series.iter().enumerate() {
                let record = SeriesRecord::from_title(*series_id, title);
                watch.push(WatchEntry {
                    id: i64::try_from(index).unwrap() + 1,
                    series_id: record.series_id,
                    title: record.title,
                    slug: record.slug,
                });
            }
        }
        repo
    }

    pub fn ledger_labels(&self) -> Vec<String> {
        self.ledger
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, label)| label.clone())
            .collect()
    }
}

#[async_trait]
impl StateRepository for MemoryRepo {
    async fn upsert_series(&self, record: &SeriesRecord) -> Result<(), StoreError> {
        let mut series = self.series.lock().unwrap();
        series.retain(|known| known.series_id != record.series_id);
        series.push(record.clone());
        Ok(())
    }

    async fn get_series(&self, series_id: i64) -> Result<Option<SeriesRecord>, StoreError> {
        Ok(self
            .series
            .lock()
            .unwrap()
            .iter()
            .find(|known| known.series_id == series_id)
            .cloned())
    }

    async fn max_series_id(&self) -> Result<Option<i64>, StoreError> {
        Ok(self.series.lock().unwrap().iter().map(|s| s.series_id).max())
    }

    async fn upsert_watch(&self, record: &SeriesRecord) -> Result<WatchUpsert, StoreError> {
        let mut watch = self.watch.lock().unwrap();
        if let Some(entry) = watch.iter_mut().find(|e| e.series_id == record.series_id) {
            entry.title.clone_from(&record.title);
            entry.slug.clone_from(&record.slug);
            return Ok(WatchUpsert::Updated(entry.id));
        }
        let id = i64::try_from(watch.len()).unwrap() + 1;
        watch.push(WatchEntry {
            id,
            series_id: record.series_id,
            title: record.title.clone(),
            slug: record.slug.clone(),
        });
        Ok(WatchUpsert::Inserted(id))
    }

    async fn list_watch(&self, series_ids: &[i64]) -> Result<Vec<WatchEntry>, StoreError> {
        Ok(self
            .watch
            .lock()
            .unwrap()
            .iter()
            .filter(|e| series_ids.is_empty() || series_ids.contains(&e.series_id))
            .cloned()
            .collect())
    }

    async fn downloaded_labels(
        &self,
        watch_id: i64,
        series_id: i64,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .iter()
            .filter(|(w, s, _)| *w == watch_id && *s == series_id)
            .map(|(_, _, label)| label.clone())
            .collect())
    }

    async fn record_download(
        &self,
        watch_id: i64,
        series_id: i64,
        chapter_label: &str,
    ) -> Result<bool, StoreError> {
        let mut ledger = self.ledger.lock().unwrap();
        let row = (watch_id, series_id, chapter_label.to_string());
        if ledger.contains(&row) {
            return Ok(false);
        }
        ledger.push(row);
        Ok(true)
    }
}
