//! Catalog discovery: probe series ids to fill the known-series table.
//!
//! Probing resumes from the highest id already known, so repeated runs only
//! look at the tail of the id space.

use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::SyncError;
use crate::api::CatalogSource;
use crate::download::{DEFAULT_PROBE_DELAY, Throttle};
use crate::store::{SeriesRecord, StateRepository};

/// Exclusive upper bound on probed series ids.
pub const DEFAULT_MAX_SERIES_ID: i64 = 1000;

/// Discovery settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Probing stops before this id.
    pub ceiling: i64,
    /// Pause after each probe.
    pub probe_delay: Duration,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_MAX_SERIES_ID,
            probe_delay: DEFAULT_PROBE_DELAY,
        }
    }
}

/// Summary of a discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// Ids probed.
    pub probed: usize,
    /// Series found and upserted, in probe order.
    pub found: Vec<SeriesRecord>,
    /// Ids whose catalog was empty.
    pub empty: usize,
    /// Ids whose probe failed.
    pub failed: Vec<i64>,
    /// True if cancellation cut the pass short.
    pub cancelled: bool,
}

fn fallback_title(series_id: i64) -> String {
    format!("Series {series_id}")
}

/// Probes ids from the highest known id (inclusive, 1 when none are known)
/// up to `options.ceiling` (exclusive).
///
/// An empty catalog is skipped. A failed probe is logged and counted.
///
/// # Errors
///
/// Returns [`SyncError::Store`] if the known-series table cannot be read or
/// written.
#[instrument(skip(repo, catalog, cancel), fields(ceiling = options.ceiling))]
pub async fn discover(
    repo: &dyn StateRepository,
    catalog: &dyn CatalogSource,
    options: &DiscoveryOptions,
    cancel: &CancellationToken,
) -> Result<DiscoveryReport, SyncError> {
    let start = repo.max_series_id().await?.unwrap_or(1).max(1);
    let throttle = Throttle::new(options.probe_delay);
    let mut report = DiscoveryReport::default();

    if start >= options.ceiling {
        info!(start, "no ids left to probe below the ceiling");
        return Ok(report);
    }

    info!(start, "starting discovery");

    for series_id in start..options.ceiling {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }

        report.probed += 1;
        match catalog.fetch_catalog(series_id).await {
            Ok(listing) if listing.is_empty() => {
                debug!(series_id, "no catalog for id");
                report.empty += 1;
            }
            Ok(listing) => {
                let title = listing
                    .series_title()
                    .map_or_else(|| fallback_title(series_id), str::to_string);
                let record = SeriesRecord::from_title(series_id, &title);
                repo.upsert_series(&record).await?;
                info!(series_id, title = %record.title, slug = %record.slug, "series found");
                report.found.push(record);
            }
            Err(e) => {
                warn!(series_id, error = %e, "probe failed");
                report.failed.push(series_id);
            }
        }

        if !throttle.wait(cancel).await {
            report.cancelled = true;
            break;
        }
    }

    info!(
        probed = report.probed,
        found = report.found.len(),
        empty = report.empty,
        failed = report.failed.len(),
        cancelled = report.cancelled,
        "discovery finished"
    );
    Ok(report)
}
