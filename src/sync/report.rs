//! Per-series outcomes and the aggregated run report.

use std::fmt;

use serde::Serialize;

/// Why the fetch loop for one series ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every planned chapter was fetched and recorded.
    Completed,
    /// The vendor denied a download location.
    QuotaExhausted,
    /// A location, download or unpack step failed.
    TransientError,
    /// A fetched chapter could not be recorded in the ledger.
    PersistenceError,
    /// Cancellation fired before the plan was finished.
    Cancelled,
}

/// Result of running the fetch loop for one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Labels fetched and recorded, in fetch order.
    pub succeeded: Vec<String>,
    /// Why the loop ended.
    pub stop: StopReason,
    /// Error text for the failing step, if any.
    pub error: Option<String>,
}

impl FetchOutcome {
    pub(crate) fn new(succeeded: Vec<String>, stop: StopReason) -> Self {
        Self {
            succeeded,
            stop,
            error: None,
        }
    }

    pub(crate) fn failed(succeeded: Vec<String>, stop: StopReason, error: impl ToString) -> Self {
        Self {
            succeeded,
            stop,
            error: Some(error.to_string()),
        }
    }
}

/// Lifecycle of one series within a run.
///
/// `Pending -> Downloading -> {Completed, QuotaExhausted, Failed, Cancelled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesState {
    /// Not yet started.
    Pending,
    /// Catalog fetched, chapters being fetched.
    Downloading,
    /// Stopped early because the vendor denied access.
    QuotaExhausted,
    /// Nothing left to fetch.
    Completed,
    /// Stopped on an error.
    Failed,
    /// Interrupted by the user.
    Cancelled,
}

impl SeriesState {
    /// Final state for a fetch loop that ended with `stop`.
    #[must_use]
    pub fn from_stop(stop: StopReason) -> Self {
        match stop {
            StopReason::Completed => Self::Completed,
            StopReason::QuotaExhausted => Self::QuotaExhausted,
            StopReason::TransientError | StopReason::PersistenceError => Self::Failed,
            StopReason::Cancelled => Self::Cancelled,
        }
    }

    /// Lowercase name used in logs and the summary.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Downloading => "downloading",
            Self::QuotaExhausted => "quota_exhausted",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SeriesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one watched series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesReport {
    /// Vendor series id.
    pub series_id: i64,
    /// Watch entry title.
    pub title: String,
    /// Final state.
    pub state: SeriesState,
    /// Labels fetched this run.
    pub downloaded: Vec<String>,
    /// Chapters excluded by gap computation.
    pub skipped: usize,
    /// Error text when the series failed.
    pub error: Option<String>,
}

impl SeriesReport {
    pub(crate) fn new(series_id: i64, title: impl Into<String>) -> Self {
        Self {
            series_id,
            title: title.into(),
            state: SeriesState::Pending,
            downloaded: Vec::new(),
            skipped: 0,
            error: None,
        }
    }
}

/// Aggregate of every series processed in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Per-series outcomes, in watch-list order.
    pub series: Vec<SeriesReport>,
}

/// Overall classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No series failed.
    Success,
    /// At least one series failed.
    Partial,
}

impl RunReport {
    /// Total chapters fetched across all series.
    #[must_use]
    pub fn downloaded_count(&self) -> usize {
        self.series.iter().map(|s| s.downloaded.len()).sum()
    }

    /// Number of series in `state`.
    #[must_use]
    pub fn count_in(&self, state: SeriesState) -> usize {
        self.series.iter().filter(|s| s.state == state).count()
    }

    /// Returns true when any series failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.count_in(SeriesState::Failed) > 0
    }

    /// Returns true when the run was interrupted.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.count_in(SeriesState::Cancelled) > 0
    }

    /// Classifies the run. Quota exhaustion and cancellation are not failures.
    #[must_use]
    pub fn outcome(&self) -> RunOutcome {
        if self.has_failures() {
            RunOutcome::Partial
        } else {
            RunOutcome::Success
        }
    }
}
