//! Human-readable stdout output.

use std::fmt::Write as _;

use chapter_sync_core::{RunReport, SeriesState, WatchSummary, WatchAddReport};

/// Renders the watch list table printed by `--list`.
pub(crate) fn render_watch_list(entries: &[WatchSummary]) -> String {
    if entries.is_empty() {
        return "Watch list is empty. Add series with --watch <ids>.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:>8}  {:>10}  TITLE", "SERIES", "CHAPTERS");
    for entry in entries {
        let _ = writeln!(
            out,
            "{:>8}  {:>10}  {}",
            entry.series_id, entry.downloaded, entry.title
        );
    }
    out
}

/// Renders a one-line-per-series summary of a sync run.
pub(crate) fn render_run_summary(report: &RunReport) -> String {
    let mut out = String::new();
    for series in &report.series {
        let _ = write!(
            out,
            "{} ({}): {}, {} new",
            series.title,
            series.series_id,
            series.state,
            series.downloaded.len()
        );
        if series.state == SeriesState::QuotaExhausted {
            out.push_str(", try again later");
        }
        if let Some(error) = &series.error {
            let _ = write!(out, " [{error}]");
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{} chapter(s) downloaded across {} series",
        report.downloaded_count(),
        report.series.len()
    );
    out
}

/// Renders the outcome of `--watch`.
pub(crate) fn render_watch_additions(report: &WatchAddReport) -> String {
    let join = |ids: &std::collections::BTreeSet<i64>| {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut out = String::new();
    if !report.added.is_empty() {
        let _ = writeln!(out, "Watching: {}", join(&report.added));
    }
    if !report.invalid.is_empty() {
        let _ = writeln!(
            out,
            "Unknown series (run --discover first): {}",
            join(&report.invalid)
        );
    }
    out
}
