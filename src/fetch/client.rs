//! HTTP client wrapper shared by the listing fetch and image downloads.
//!
//! One [`HttpClient`] is built per run and cloned into download tasks, so the
//! listing page and every image reuse the same connection pool, timeout
//! policy, and browser User-Agent.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use super::error::HttpError;
use crate::user_agent;

/// Timeout and identity settings applied to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds (headers and body).
    pub timeout_secs: u64,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: user_agent::BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl HttpSettings {
    /// Builds settings with an optional User-Agent override.
    #[must_use]
    pub fn new(connect_timeout_secs: u64, timeout_secs: u64, user_agent: Option<&str>) -> Self {
        Self {
            connect_timeout_secs,
            timeout_secs,
            user_agent: user_agent::resolve_user_agent(user_agent),
        }
    }
}

/// HTTP client for the listing page and image bytes.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] if the TLS backend or proxy
    /// configuration cannot be initialised.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_settings(&HttpSettings::default())
    }

    /// Creates a client with explicit timeouts and User-Agent.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] if construction fails.
    #[instrument(level = "debug", skip(settings), fields(timeout_secs = settings.timeout_secs))]
    pub fn with_settings(settings: &HttpSettings) -> Result<Self, HttpError> {
        let client = build_client(settings)?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the body as text.
    ///
    /// Used for the listing page. There is no retry: any failure is returned
    /// to the caller, which treats it as fatal.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the URL is invalid, the request fails or
    /// times out, the server returns a non-2xx status, or the body cannot
    /// be read.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_text(&self, url: &str) -> Result<String, HttpError> {
        let response = self.get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::from_body(url, e))?;
        debug!(bytes = body.len(), "fetched page body");
        Ok(body)
    }

    /// Sends a GET request and returns the response when its status is a success.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for invalid URLs, transport failures, timeouts,
    /// and non-2xx statuses.
    pub async fn get(&self, url: &str) -> Result<Response, HttpError> {
        Url::parse(url).map_err(|_| HttpError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::from_send(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::status(url, status.as_u16()));
        }
        Ok(response)
    }
}

fn build_client(settings: &HttpSettings) -> Result<Client, HttpError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.timeout_secs))
        .gzip(true)
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|error| HttpError::ClientBuild {
            reason: error.to_string(),
        })
}
