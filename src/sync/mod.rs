//! Incremental synchronization of watched series.
//!
//! - [`compute_missing`] decides which chapters are still needed
//! - [`SyncEngine`] fetches them in publication order and records each one
//! - [`add_to_watch`] and [`discover`] maintain the watch list and the
//!   known-series table the engine works from

mod discovery;
mod engine;
mod error;
mod gap;
mod report;
mod watch;

pub use discovery::{DEFAULT_MAX_SERIES_ID, DiscoveryOptions, DiscoveryReport, discover};
pub use engine::{SyncEngine, SyncOptions};
pub use error::SyncError;
pub use gap::{GapPlan, SkipReason, SkippedChapter, compute_missing, label_key};
pub use report::{FetchOutcome, RunOutcome, RunReport, SeriesReport, SeriesState, StopReason};
pub use watch::{WatchAddReport, add_to_watch};
