//! Exit code logic for the chapter-sync process.
//!
//! Single responsibility: map run outcomes to the process exit outcome.

use chapter_sync_core::{RunOutcome, RunReport};

use crate::ProcessExit;

/// Determines the process exit outcome from the sync report and the number
/// of failed discovery probes.
///
/// Quota exhaustion and cancellation are expected stops and exit cleanly.
pub(crate) fn determine_exit_outcome(report: &RunReport, failed_probes: usize) -> ProcessExit {
    if report.outcome() == RunOutcome::Partial || failed_probes > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Success
    }
}

#[cfg(test)]
mod tests {
    use super::determine_exit_outcome;
    use crate::ProcessExit;
    use chapter_sync_core::{RunReport, SeriesReport, SeriesState};

    fn series(state: SeriesState) -> SeriesReport {
        SeriesReport {
            series_id: 1,
            title: "t".to_string(),
            state,
            downloaded: Vec::new(),
            skipped: 0,
            error: None,
        }
    }

    #[test]
    fn test_exit_outcome_success_when_no_failures() {
        let report = RunReport {
            series: vec![series(SeriesState::Completed)],
        };
        assert_eq!(determine_exit_outcome(&report, 0), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_success_on_quota_exhaustion() {
        let report = RunReport {
            series: vec![series(SeriesState::QuotaExhausted)],
        };
        assert_eq!(determine_exit_outcome(&report, 0), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_partial_when_series_failed() {
        let report = RunReport {
            series: vec![series(SeriesState::Completed), series(SeriesState::Failed)],
        };
        assert_eq!(determine_exit_outcome(&report, 0), ProcessExit::Partial);
    }

    #[test]
    fn test_exit_outcome_partial_when_probe_failed() {
        assert_eq!(
            determine_exit_outcome(&RunReport::default(), 2),
            ProcessExit::Partial
        );
    }
}
