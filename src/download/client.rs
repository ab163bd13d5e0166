//! HTTP client wrapper for fetching chapter archives.
//!
//! Archives are small enough to buffer, so the body is streamed into memory
//! with a size cap and handed to [`unpack_archive`](super::unpack_archive)
//! on a blocking thread. Nothing but the extracted pages lands on disk.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument};

use super::ArchiveFetcher;
use super::constants::{CONNECT_TIMEOUT_SECS, MAX_ARCHIVE_BYTES, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::unpack::{UnpackSummary, unpack_archive};

/// HTTP client for chapter archives.
///
/// Create once and reuse; the inner client pools connections.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    max_bytes: u64,
}

impl HttpClient {
    /// Creates a client with the default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Network`] when the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(concat!("chapter-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DownloadError::network("<client builder>", e))?;
        Ok(Self {
            client,
            max_bytes: MAX_ARCHIVE_BYTES,
        })
    }

    #[cfg(test)]
    fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Downloads `url` into memory.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::HttpStatus`] for non-2xx responses,
    /// [`DownloadError::TooLarge`] when the body exceeds the cap, and
    /// network errors otherwise.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes
        {
            return Err(DownloadError::TooLarge {
                url: url.to_string(),
                limit_bytes: self.max_bytes,
            });
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(DownloadError::TooLarge {
                    url: url.to_string(),
                    limit_bytes: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(bytes = body.len(), "archive fetched");
        Ok(body)
    }
}

#[async_trait]
impl ArchiveFetcher for HttpClient {
    #[instrument(skip(self), fields(dest = %dest.display()))]
    async fn fetch_and_unpack(&self, url: &str, dest: &Path) -> Result<UnpackSummary, DownloadError> {
        let bytes = self.fetch_bytes(url).await?;
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || unpack_archive(&bytes, &dest))
            .await
            .map_err(|e| DownloadError::Task(e.to_string()))?
    }
}
