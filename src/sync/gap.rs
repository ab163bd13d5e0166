//! Gap computation: which remote chapters still need fetching.

use std::collections::HashSet;
use std::fmt;

use crate::api::ChapterRecord;

/// Why a remote chapter was left out of the fetch list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The ledger already has this label.
    AlreadyDownloaded,
    /// The chapter carries a price.
    Paywalled,
    /// The vendor has not flagged it as published.
    Unpublished,
    /// Its publication time is after the cutoff.
    NotYetReleased,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AlreadyDownloaded => "already downloaded",
            Self::Paywalled => "paywalled",
            Self::Unpublished => "unpublished",
            Self::NotYetReleased => "not yet released",
        };
        f.write_str(label)
    }
}

/// A chapter that was excluded, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChapter {
    /// Chapter label as reported remotely.
    pub label: String,
    /// Reason for exclusion.
    pub reason: SkipReason,
}

/// Output of [`compute_missing`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GapPlan {
    /// Chapters to fetch, oldest first.
    pub to_download: Vec<ChapterRecord>,
    /// Chapters left out, oldest first.
    pub skipped: Vec<SkippedChapter>,
}

impl GapPlan {
    /// Returns true when nothing needs fetching.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_download.is_empty()
    }
}

/// Canonical comparison key for a chapter label.
///
/// Labels that parse as finite numbers compare by value, so `"12"`,
/// `"12.0"` and `" 12 "` share a key. Anything else compares by its trimmed
/// text.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn label_key(label: &str) -> String {
    let trimmed = label.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            // -0 and 0 are the same chapter
            let value = if value == 0.0 { 0.0 } else { value };
            format!("{value}")
        }
        _ => trimmed.to_string(),
    }
}

/// Computes the chapters of `remote` that still need fetching.
///
/// The result is sorted by publication time (stable, so equal timestamps
/// keep catalog order). With `force_all` every chapter is returned.
/// Otherwise a chapter is included only if its label is not in
/// `downloaded`, it is free, it is published and, when `publish_cutoff` is
/// set, it was published at or before the cutoff.
#[must_use]
pub fn compute_missing(
    remote: &[ChapterRecord],
    downloaded: &[String],
    force_all: bool,
    publish_cutoff: Option<i64>,
) -> GapPlan {
    let mut ordered: Vec<&ChapterRecord> = remote.iter().collect();
    ordered.sort_by_key(|chapter| chapter.publication_timestamp);

    if force_all {
        return GapPlan {
            to_download: ordered.into_iter().cloned().collect(),
            skipped: Vec::new(),
        };
    }

    let owned: HashSet<String> = downloaded.iter().map(|label| label_key(label)).collect();
    let mut plan = GapPlan::default();

    for chapter in ordered {
        let reason = if owned.contains(&label_key(&chapter.label)) {
            Some(SkipReason::AlreadyDownloaded)
        } else if !chapter.is_free() {
            Some(SkipReason::Paywalled)
        } else if !chapter.is_published {
            Some(SkipReason::Unpublished)
        } else if publish_cutoff.is_some_and(|cutoff| chapter.publication_timestamp > cutoff) {
            Some(SkipReason::NotYetReleased)
        } else {
            None
        };

        match reason {
            Some(reason) => plan.skipped.push(SkippedChapter {
                label: chapter.label.clone(),
                reason,
            }),
            None => plan.to_download.push(chapter.clone()),
        }
    }

    plan
}
