//! Vendor catalog access.
//!
//! The sync engine only sees two capabilities:
//! - [`CatalogSource`] lists the chapters of a series
//! - [`ArchiveLocator`] resolves a chapter to a download URL, or reports that
//!   the account's quota is exhausted
//!
//! [`VendorClient`] implements both against the vendor's HTTP API.

mod client;
mod error;
mod types;

pub use client::{Credentials, DEFAULT_API_BASE_URL, VendorClient};
pub use error::ApiError;
pub use types::{ArchiveLocation, ChapterListing, ChapterRecord};

use async_trait::async_trait;

/// Lists the chapters published for a series.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches the catalog for `series_id`.
    ///
    /// An unassigned id yields an empty listing, not an error.
    async fn fetch_catalog(&self, series_id: i64) -> Result<ChapterListing, ApiError>;
}

/// Resolves chapters to downloadable archive locations.
#[async_trait]
pub trait ArchiveLocator: Send + Sync {
    /// Resolves the archive location for `chapter_id`.
    ///
    /// Quota exhaustion is reported as [`ArchiveLocation::Denied`].
    async fn fetch_download_location(&self, chapter_id: &str) -> Result<ArchiveLocation, ApiError>;
}
