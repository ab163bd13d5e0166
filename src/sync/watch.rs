//! Adding known series to the watch list.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::SyncError;
use crate::store::{StateRepository, WatchUpsert};

/// Result of [`add_to_watch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WatchAddReport {
    /// Ids now on the watch list.
    pub added: BTreeSet<i64>,
    /// Ids with no known-series record; nothing was written for them.
    pub invalid: BTreeSet<i64>,
}

/// Upserts a watch entry for every candidate present in the known-series
/// table.
///
/// Unknown ids are reported in `invalid` and do not stop the others.
/// Re-adding a watched id refreshes its title and slug in place.
///
/// # Errors
///
/// Returns [`SyncError::Store`] if the store cannot be read or written.
#[instrument(skip(repo, candidates), fields(candidates = candidates.len()))]
pub async fn add_to_watch(
    repo: &dyn StateRepository,
    candidates: &BTreeSet<i64>,
) -> Result<WatchAddReport, SyncError> {
    let mut report = WatchAddReport::default();

    for &series_id in candidates {
        let Some(record) = repo.get_series(series_id).await? else {
            warn!(series_id, "unknown series id; run discovery first");
            report.invalid.insert(series_id);
            continue;
        };

        match repo.upsert_watch(&record).await? {
            WatchUpsert::Inserted(id) => {
                info!(series_id, watch_id = id, title = %record.title, "now watching series");
            }
            WatchUpsert::Updated(id) => {
                info!(series_id, watch_id = id, title = %record.title, "already watching; entry refreshed");
            }
        }
        report.added.insert(series_id);
    }

    Ok(report)
}
