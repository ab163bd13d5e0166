//! Error types for the download module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or unpacking a chapter archive.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Archive is larger than the configured cap.
    #[error("archive at {url} exceeds {limit_bytes} bytes")]
    TooLarge {
        /// Source URL.
        url: String,
        /// Byte cap that was hit.
        limit_bytes: u64,
    },

    /// File system error while writing chapter files.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The archive could not be read.
    #[error("invalid chapter archive for {dest}: {reason}")]
    Archive {
        /// Destination folder of the unpack.
        dest: PathBuf,
        /// Reader message.
        reason: String,
    },

    /// The blocking unpack task did not complete.
    #[error("unpack task failed: {0}")]
    Task(String),
}

impl DownloadError {
    /// Creates a network error from a reqwest error, folding timeouts into
    /// [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            return Self::Timeout { url };
        }
        Self::Network { url, source }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an archive format error.
    pub fn archive(dest: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Archive {
            dest: dest.into(),
            reason: reason.into(),
        }
    }
}
