//! Chapter archive retrieval.
//!
//! [`HttpClient`] downloads an archive into memory and [`unpack_archive`]
//! writes its pages into the chapter folder. [`Throttle`] paces requests.
//!
//! # Example
//!
//! ```no_run
//! use chapter_sync_core::download::{ArchiveFetcher, HttpClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let summary = client
//!     .fetch_and_unpack("https://cdn.example.com/chapter.zip", Path::new("./data/series/1"))
//!     .await?;
//! println!("wrote {} files", summary.files.len());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod throttle;
mod unpack;

use std::path::Path;

use async_trait::async_trait;

pub use client::HttpClient;
pub use constants::{DEFAULT_CHAPTER_DELAY, DEFAULT_PROBE_DELAY};
pub use error::DownloadError;
pub use throttle::Throttle;
pub use unpack::{METADATA_FILE, SENTINEL_ENTRY, UnpackSummary, unpack_archive};

/// Fetches an archive and unpacks it into a chapter folder.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Downloads `url` and extracts it into `dest`.
    async fn fetch_and_unpack(&self, url: &str, dest: &Path) -> Result<UnpackSummary, DownloadError>;
}

// Note: we do NOT define module-local Result aliases here.
// Use `Result<T, DownloadError>` explicitly in function signatures.
