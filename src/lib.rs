//! chapter-sync core library
//!
//! Keeps a local archive of followed comic series in step with the vendor's
//! catalog: it works out which chapters are missing, fetches them oldest
//! first, and records every success so later runs never fetch a chapter
//! twice.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`api`] - Vendor catalog and archive-location client
//! - [`db`] - Database connection and schema management
//! - [`download`] - Archive fetching, unpacking and request pacing
//! - [`layout`] - On-disk folder naming
//! - [`store`] - Known series, watch list and download ledger
//! - [`sync`] - Gap computation, the sync engine, watch-list and discovery flows

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod db;
pub mod download;
pub mod layout;
pub mod store;
pub mod sync;
#[cfg(test)]
pub mod test_support;

// Re-export commonly used types
pub use api::{
    ApiError, ArchiveLocation, ArchiveLocator, CatalogSource, ChapterListing, ChapterRecord,
    Credentials, DEFAULT_API_BASE_URL, VendorClient,
};
pub use db::{Database, DbError};
pub use download::{ArchiveFetcher, DownloadError, HttpClient, Throttle, UnpackSummary};
pub use store::{
    LedgerEntry, SeriesRecord, StateRepository, Store, StoreDbErrorKind, StoreError, WatchEntry,
    WatchSummary, WatchUpsert,
};
pub use sync::{
    DiscoveryOptions, DiscoveryReport, FetchOutcome, GapPlan, RunOutcome, RunReport, SeriesReport,
    SeriesState, SkipReason, StopReason, SyncEngine, SyncError, SyncOptions, WatchAddReport,
    add_to_watch, compute_missing, discover,
};
