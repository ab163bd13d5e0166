//! Chapter archive extraction.
//!
//! Entries are written flat into the chapter folder using their base name.
//! The `0.jpg` entry is a cover placeholder and is dropped. JSON entries are
//! renamed to `metadata.json`.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};
use zip::ZipArchive;

use super::error::DownloadError;

/// Archive entry that is never extracted.
pub const SENTINEL_ENTRY: &str = "0.jpg";

/// Name JSON entries are written under.
pub const METADATA_FILE: &str = "metadata.json";

/// Result of one unpack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnpackSummary {
    /// Output file names, in archive order.
    pub files: Vec<String>,
    /// Entries dropped (directories, the sentinel, unsafe names).
    pub skipped: usize,
}

/// Maps an entry base name to its output name, or `None` to skip it.
fn output_name(base_name: &str) -> Option<String> {
    if base_name == SENTINEL_ENTRY {
        return None;
    }
    let is_json = Path::new(base_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Some(METADATA_FILE.to_string())
    } else {
        Some(base_name.to_string())
    }
}

/// Extracts `bytes` into `dest`, creating the folder if needed.
///
/// Existing files with the same names are overwritten.
///
/// # Errors
///
/// Returns [`DownloadError::Archive`] when the bytes are not a readable zip
/// and [`DownloadError::Io`] when writing fails.
pub fn unpack_archive(bytes: &[u8], dest: &Path) -> Result<UnpackSummary, DownloadError> {
    std::fs::create_dir_all(dest).map_err(|e| DownloadError::io(dest, e))?;

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| DownloadError::archive(dest, e.to_string()))?;

    let mut summary = UnpackSummary::default();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| DownloadError::archive(dest, e.to_string()))?;

        if entry.is_dir() {
            summary.skipped += 1;
            continue;
        }

        let base_name = entry
            .enclosed_name()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned());
        let Some(base_name) = base_name else {
            warn!(entry = entry.name(), "skipping archive entry with unsafe name");
            summary.skipped += 1;
            continue;
        };

        let Some(out_name) = output_name(&base_name) else {
            summary.skipped += 1;
            continue;
        };

        let out_path = dest.join(&out_name);
        let mut out = File::create(&out_path).map_err(|e| DownloadError::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| DownloadError::io(&out_path, e))?;
        summary.files.push(out_name);
    }

    debug!(
        dest = %dest.display(),
        files = summary.files.len(),
        skipped = summary.skipped,
        "archive unpacked"
    );
    Ok(summary)
}
