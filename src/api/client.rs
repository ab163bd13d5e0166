//! HTTP client for the vendor's mobile API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, REFERER};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::error::ApiError;
use super::types::{
    ArchiveLocation, ChapterListing, DENIED_MARKER, LocationResponse, SeriesResponse,
};
use super::{ArchiveLocator, CatalogSource};

/// Production API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.viz.com";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

const APP_USER_AGENT: &str = "Weekly%20Shonen%20Jump/1 CFNetwork/1490.0.4 Darwin/23.2.0";
const APP_KEY_HEADER: &str = "x-devil-fruit";
const APP_KEY_VALUE: &str = "5.5.7 gum-gum fruits";
const APP_REFERER: &str = "com.viz.wsj";
const APP_ID: &str = "3";
const API_VERSION: &str = "9";
const ZERO_IDFA: &str = "00000000-0000-0000-0000-000000000000";

/// Account identifiers sent with archive-location requests.
///
/// Each field is optional so catalog browsing works without an account.
#[derive(Clone, Default)]
pub struct Credentials {
    /// `INSTANCE_ID`
    pub instance_id: Option<String>,
    /// `DEVICE_ID`
    pub device_id: Option<String>,
    /// `USER_JWT`
    pub user_jwt: Option<String>,
    /// `USER_ID`
    pub user_id: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("instance_id", &self.instance_id.is_some())
            .field("device_id", &self.device_id.is_some())
            .field("user_jwt", &self.user_jwt.is_some())
            .field("user_id", &self.user_id.is_some())
            .finish()
    }
}

impl Credentials {
    /// Reads credentials from `INSTANCE_ID`, `DEVICE_ID`, `USER_JWT` and `USER_ID`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            instance_id: env_non_empty("INSTANCE_ID"),
            device_id: env_non_empty("DEVICE_ID"),
            user_jwt: env_non_empty("USER_JWT"),
            user_id: env_non_empty("USER_ID"),
        }
    }

    /// Names of the variables that are not set.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("INSTANCE_ID", &self.instance_id),
            ("DEVICE_ID", &self.device_id),
            ("USER_JWT", &self.user_jwt),
            ("USER_ID", &self.user_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    fn require<'a>(value: Option<&'a String>, name: &'static str) -> Result<&'a str, ApiError> {
        value
            .map(String::as_str)
            .ok_or(ApiError::MissingCredential { name })
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Vendor API client implementing [`CatalogSource`] and [`ArchiveLocator`].
#[derive(Debug, Clone)]
pub struct VendorClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl VendorClient {
    /// Builds a client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] when `base_url` does not parse,
    /// or [`ApiError::Network`] when the HTTP client cannot be constructed.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url).map_err(|error| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: error.to_string(),
        })?;
        // Endpoints are joined relative to the base, so a path prefix must end in `/`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .user_agent(APP_USER_AGENT)
            .default_headers(app_headers())
            .gzip(true)
            .build()
            .map_err(|error| ApiError::network(base_url.as_str(), error))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|error| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: error.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let endpoint = url.path().to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| ApiError::network(&endpoint, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http_status(&endpoint, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| ApiError::network(&endpoint, error))?;

        serde_json::from_slice(&body).map_err(|error| ApiError::decode(&endpoint, error.to_string()))
    }
}

fn app_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-CA,en-US;q=0.9,en;q=0.8"),
    );
    headers.insert(REFERER, HeaderValue::from_static(APP_REFERER));
    headers.insert(
        HeaderName::from_static(APP_KEY_HEADER),
        HeaderValue::from_static(APP_KEY_VALUE),
    );
    headers
}

#[async_trait]
impl CatalogSource for VendorClient {
    #[instrument(skip(self))]
    async fn fetch_catalog(&self, series_id: i64) -> Result<ChapterListing, ApiError> {
        let url = self.endpoint(&format!("manga/store/series/{series_id}/1/1/8"))?;
        let response: SeriesResponse = self.get_json(url).await?;
        let listing = ChapterListing::from(response);
        debug!(series_id, chapters = listing.chapters.len(), "fetched catalog");
        Ok(listing)
    }
}

#[async_trait]
impl ArchiveLocator for VendorClient {
    #[instrument(skip(self))]
    async fn fetch_download_location(&self, chapter_id: &str) -> Result<ArchiveLocation, ApiError> {
        let creds = &self.credentials;
        let instance_id = Credentials::require(creds.instance_id.as_ref(), "INSTANCE_ID")?;
        let device_id = Credentials::require(creds.device_id.as_ref(), "DEVICE_ID")?;
        let user_jwt = Credentials::require(creds.user_jwt.as_ref(), "USER_JWT")?;
        let user_id = Credentials::require(creds.user_id.as_ref(), "USER_ID")?;

        let mut url = self.endpoint("manga/get_manga_url")?;
        url.query_pairs_mut()
            .append_pair("instance_id", instance_id)
            .append_pair("device_id", device_id)
            .append_pair("manga_id", chapter_id)
            .append_pair("viz_app_id", APP_ID)
            .append_pair("trust_user_jwt", user_jwt)
            .append_pair("user_id", user_id)
            .append_pair("version", API_VERSION)
            .append_pair("metadata", "true")
            .append_pair("idfa", ZERO_IDFA);

        let endpoint = url.path().to_string();
        let response: LocationResponse = self.get_json(url).await?;
        match response.data.as_deref().map(str::trim) {
            Some(DENIED_MARKER) => Ok(ArchiveLocation::Denied),
            Some(location) if !location.is_empty() => Ok(ArchiveLocation::Url(location.to_string())),
            _ => Err(ApiError::decode(endpoint, "response carried no download location")),
        }
    }
}
