//! On-disk layout for downloaded chapters.
//!
//! Chapters land in `{data_dir}/{series_slug}/{chapter_label}/`. Both path
//! segments come from remote data, so they are sanitized before use.

use std::path::{Path, PathBuf};

/// Derives a lowercase, dash-separated ASCII folder name from a series title.
///
/// Non-ASCII letters are transliterated ("Pokémon" becomes "pokemon") and
/// runs of anything that is not alphanumeric collapse into a single `-`.
/// Returns `"untitled"` when nothing usable remains.
#[must_use]
pub fn slugify(title: &str) -> String {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Makes a single path segment safe to join under a directory.
///
/// Separators and reserved characters become `_`; `.` and `..` are rewritten
/// so the segment can never climb out of its parent.
#[must_use]
pub fn sanitize_segment(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }
    if sanitized.chars().all(|c| c == '.') {
        return sanitized.replace('.', "_");
    }
    sanitized
}

/// Destination folder for one chapter.
#[must_use]
pub fn chapter_dir(data_dir: &Path, series_slug: &str, chapter_label: &str) -> PathBuf {
    data_dir
        .join(sanitize_segment(series_slug))
        .join(sanitize_segment(chapter_label))
}
