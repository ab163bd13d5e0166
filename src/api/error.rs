//! Error types for vendor API calls.

use thiserror::Error;

/// Errors returned by the catalog and archive-location capabilities.
///
/// A denied download is not an error; see
/// [`ArchiveLocation::Denied`](super::ArchiveLocation::Denied).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("network error calling {endpoint}: {source}")]
    Network {
        /// Endpoint that failed.
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus {
        /// Endpoint that failed.
        endpoint: String,
        /// Response status code.
        status: u16,
    },

    /// Response body could not be decoded.
    #[error("malformed response from {endpoint}: {reason}")]
    Decode {
        /// Endpoint that returned the body.
        endpoint: String,
        /// Decoder message.
        reason: String,
    },

    /// A request needed credentials that are not configured.
    #[error(
        "missing vendor credential {name}\n  Suggestion: set {name} in the environment or in a .env file"
    )]
    MissingCredential {
        /// Environment variable name.
        name: &'static str,
    },

    /// The configured base URL cannot be used.
    #[error("invalid API base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// Offending value.
        url: String,
        /// Parser message.
        reason: String,
    },
}

impl ApiError {
    /// Creates a network error.
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Creates a decode error.
    pub fn decode(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_http_status_display() {
        let err = ApiError::http_status("/manga/store/series/1/1/1/8", 503);
        assert_eq!(err.to_string(), "HTTP 503 from /manga/store/series/1/1/1/8");
    }

    #[test]
    fn test_api_error_missing_credential_has_suggestion() {
        let err = ApiError::MissingCredential { name: "USER_JWT" };
        let msg = err.to_string();
        assert!(msg.contains("USER_JWT"));
        assert!(msg.contains("Suggestion"));
    }

    #[test]
    fn test_api_error_decode_display() {
        let err = ApiError::decode("/x", "expected value at line 1");
        assert!(err.to_string().contains("malformed response from /x"));
    }
}
