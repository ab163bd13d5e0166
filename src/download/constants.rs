//! Constants for the download module (timeouts, throttling, limits).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large archives).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Largest chapter archive accepted (512 MiB).
pub const MAX_ARCHIVE_BYTES: u64 = 512 * 1024 * 1024;

/// Delay before every chapter fetch.
pub const DEFAULT_CHAPTER_DELAY: Duration = Duration::from_secs(5);

/// Delay after every discovery probe.
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_secs(1);
