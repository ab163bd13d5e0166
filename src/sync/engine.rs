//! Synchronization engine: brings every watched series up to date.
//!
//! For each watch entry the engine fetches the remote catalog, computes the
//! gap against the ledger, and fetches the missing chapters oldest first.
//! Each chapter is recorded in the ledger as soon as it is on disk, so an
//! interrupted series always holds a contiguous prefix of its history.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use chapter_sync_core::{
//!     Credentials, Database, HttpClient, Store, SyncEngine, SyncOptions, VendorClient,
//!     DEFAULT_API_BASE_URL,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(Store::new(Database::new_in_memory().await?));
//! let vendor = Arc::new(VendorClient::new(DEFAULT_API_BASE_URL, Credentials::from_env())?);
//! let engine = SyncEngine::new(
//!     store,
//!     vendor.clone(),
//!     vendor,
//!     Arc::new(HttpClient::new()?),
//!     PathBuf::from("./data"),
//!     SyncOptions::default(),
//! );
//! let report = engine.run(&CancellationToken::new()).await?;
//! println!("downloaded {} chapters", report.downloaded_count());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::error::SyncError;
use super::gap::{SkipReason, compute_missing};
use super::report::{FetchOutcome, RunReport, SeriesReport, SeriesState, StopReason};
use crate::api::{ArchiveLocation, ArchiveLocator, CatalogSource, ChapterRecord};
use crate::download::{ArchiveFetcher, DEFAULT_CHAPTER_DELAY, Throttle};
use crate::layout::chapter_dir;
use crate::store::{StateRepository, WatchEntry};

/// Options for one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Fetch every remote chapter, ignoring ledger, price and publish flags.
    pub force: bool,
    /// Restrict the run to these series ids; empty means every watched series.
    pub target_series_ids: Vec<i64>,
    /// Delay before each chapter fetch.
    pub chapter_delay: Duration,
    /// Skip chapters published after this epoch second.
    pub publish_cutoff: Option<i64>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force: false,
            target_series_ids: Vec::new(),
            chapter_delay: DEFAULT_CHAPTER_DELAY,
            publish_cutoff: None,
        }
    }
}

/// Sequential synchronization engine.
///
/// All collaborators are trait objects so tests can substitute in-memory
/// fakes for the vendor and the archive host.
pub struct SyncEngine {
    repo: Arc<dyn StateRepository>,
    catalog: Arc<dyn CatalogSource>,
    locator: Arc<dyn ArchiveLocator>,
    fetcher: Arc<dyn ArchiveFetcher>,
    data_dir: PathBuf,
    options: SyncOptions,
    throttle: Throttle,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("data_dir", &self.data_dir)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Creates an engine writing chapters under `data_dir`.
    #[must_use]
    pub fn new(
        repo: Arc<dyn StateRepository>,
        catalog: Arc<dyn CatalogSource>,
        locator: Arc<dyn ArchiveLocator>,
        fetcher: Arc<dyn ArchiveFetcher>,
        data_dir: PathBuf,
        options: SyncOptions,
    ) -> Self {
        debug!(
            data_dir = %data_dir.display(),
            force = options.force,
            chapter_delay_ms = options.chapter_delay.as_millis(),
            publish_cutoff = ?options.publish_cutoff,
            "creating sync engine"
        );
        let throttle = Throttle::new(options.chapter_delay);
        Self {
            repo,
            catalog,
            locator,
            fetcher,
            data_dir,
            options,
            throttle,
        }
    }

    /// Synchronizes every targeted watch entry, in watch-list order.
    ///
    /// Per-series failures are recorded in the report and never abort the
    /// run. Once `cancel` fires, remaining series are reported as cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the watch list cannot be read.
    #[instrument(skip(self, cancel), fields(targets = self.options.target_series_ids.len()))]
    pub async fn run(&self, cancel: &CancellationToken) -> Result<RunReport, SyncError> {
        let entries = self.repo.list_watch(&self.options.target_series_ids).await?;

        for target in &self.options.target_series_ids {
            if !entries.iter().any(|entry| entry.series_id == *target) {
                warn!(series_id = target, "series is not on the watch list, skipping");
            }
        }

        info!(series = entries.len(), "starting sync");

        let mut report = RunReport::default();
        for entry in entries {
            if cancel.is_cancelled() {
                let mut series = SeriesReport::new(entry.series_id, entry.title);
                series.state = SeriesState::Cancelled;
                report.series.push(series);
                continue;
            }
            report.series.push(self.sync_series(&entry, cancel).await);
        }

        info!(
            downloaded = report.downloaded_count(),
            completed = report.count_in(SeriesState::Completed),
            quota_exhausted = report.count_in(SeriesState::QuotaExhausted),
            failed = report.count_in(SeriesState::Failed),
            cancelled = report.count_in(SeriesState::Cancelled),
            "sync finished"
        );
        Ok(report)
    }

    /// Brings one series up to date.
    #[instrument(skip(self, entry, cancel), fields(series_id = entry.series_id, title = %entry.title))]
    pub async fn sync_series(&self, entry: &WatchEntry, cancel: &CancellationToken) -> SeriesReport {
        let mut report = SeriesReport::new(entry.series_id, entry.title.clone());

        let listing = match self.catalog.fetch_catalog(entry.series_id).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(error = %e, "catalog fetch failed");
                report.state = SeriesState::Failed;
                report.error = Some(e.to_string());
                return report;
            }
        };

        if listing.is_empty() {
            info!("catalog is empty, nothing to do");
            report.state = SeriesState::Completed;
            return report;
        }

        let downloaded = match self.repo.downloaded_labels(entry.id, entry.series_id).await {
            Ok(labels) => labels,
            Err(e) => {
                error!(error = %e, "could not read download ledger");
                report.state = SeriesState::Failed;
                report.error = Some(e.to_string());
                return report;
            }
        };

        let plan = compute_missing(
            &listing.chapters,
            &downloaded,
            self.options.force,
            self.options.publish_cutoff,
        );

        for skipped in &plan.skipped {
            if skipped.reason == SkipReason::AlreadyDownloaded {
                debug!(label = %skipped.label, reason = %skipped.reason, "chapter skipped");
            } else {
                info!(label = %skipped.label, reason = %skipped.reason, "chapter skipped");
            }
        }
        report.skipped = plan.skipped.len();

        info!(
            remote = listing.chapters.len(),
            owned = downloaded.len(),
            missing = plan.to_download.len(),
            "computed missing chapters"
        );

        report.state = SeriesState::Downloading;
        let outcome = self.download_missing(entry, &plan.to_download, cancel).await;

        report.state = SeriesState::from_stop(outcome.stop);
        report.downloaded = outcome.succeeded;
        report.error = outcome.error;
        report
    }

    /// Fetches `to_download` in order, recording each success in the ledger.
    ///
    /// The loop stops at the first denied location, failed fetch or failed
    /// ledger write, so the recorded chapters are always a prefix of
    /// `to_download`.
    #[instrument(skip(self, entry, to_download, cancel), fields(series_id = entry.series_id, planned = to_download.len()))]
    pub async fn download_missing(
        &self,
        entry: &WatchEntry,
        to_download: &[ChapterRecord],
        cancel: &CancellationToken,
    ) -> FetchOutcome {
        let mut succeeded = Vec::with_capacity(to_download.len());

        for chapter in to_download {
            if !self.throttle.wait(cancel).await {
                info!(fetched = succeeded.len(), "cancelled");
                return FetchOutcome::new(succeeded, StopReason::Cancelled);
            }

            let url = match self.locator.fetch_download_location(&chapter.chapter_id).await {
                Ok(ArchiveLocation::Url(url)) => url,
                Ok(ArchiveLocation::Denied) => {
                    warn!(label = %chapter.label, fetched = succeeded.len(), "download quota exhausted");
                    return FetchOutcome::new(succeeded, StopReason::QuotaExhausted);
                }
                Err(e) => {
                    warn!(label = %chapter.label, error = %e, "download location lookup failed");
                    return FetchOutcome::failed(succeeded, StopReason::TransientError, e);
                }
            };

            let dest = chapter_dir(&self.data_dir, &entry.slug, &chapter.label);
            let summary = match self.fetcher.fetch_and_unpack(&url, &dest).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(label = %chapter.label, error = %e, "chapter download failed");
                    return FetchOutcome::failed(succeeded, StopReason::TransientError, e);
                }
            };

            match self
                .repo
                .record_download(entry.id, entry.series_id, &chapter.label)
                .await
            {
                Ok(inserted) => {
                    if !inserted {
                        debug!(label = %chapter.label, "ledger already had this chapter");
                    }
                    info!(
                        label = %chapter.label,
                        files = summary.files.len(),
                        dest = %dest.display(),
                        "chapter downloaded"
                    );
                    succeeded.push(chapter.label.clone());
                }
                Err(e) => {
                    error!(
                        series_id = entry.series_id,
                        label = %chapter.label,
                        error = %e,
                        "chapter is on disk but could not be recorded; it will be fetched again"
                    );
                    return FetchOutcome::failed(succeeded, StopReason::PersistenceError, e);
                }
            }
        }

        FetchOutcome::new(succeeded, StopReason::Completed)
    }
}
