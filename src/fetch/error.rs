//! Error types for HTTP fetches.
//!
//! A failed listing fetch aborts the run; the same type also describes the
//! transport part of a failed image download.

use thiserror::Error;

/// Errors raised by [`HttpClient`](super::HttpClient) requests.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Status {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Response headers arrived but the body could not be read.
    #[error("failed reading response body from {url}: {source}")]
    Body {
        /// The URL whose body failed.
        url: String,
        /// The underlying read error.
        #[source]
        source: reqwest::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {reason}")]
    ClientBuild {
        /// Why construction failed.
        reason: String,
    },
}

impl HttpError {
    /// Creates an error from a transport failure, promoting timeouts.
    pub fn from_send(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an error from a body read failure, promoting timeouts.
    pub fn from_body(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Body {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}
