//! Shared HTTP plumbing for the source clients.
//!
//! Both clients use one `reqwest::Client` built from
//! [`HttpClientConfig`], and map transport failures onto
//! [`FetchError`] the same way.

use std::time::Duration;

use mapfeed_core::FetchError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Default user agent for source requests.
pub const DEFAULT_USER_AGENT: &str = "mapfeed/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error raised when an HTTP client cannot be constructed.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Transport configuration shared by the source clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Connect and total request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpClientConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn build_client(&self) -> Result<Client, ClientBuildError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)
    }
}

/// Issue a GET for `url` and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<T, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout))?
        .error_for_status()
        .map_err(|err| convert_reqwest_error(&err, url.as_str(), timeout))?;

    response.json().await.map_err(|err| {
        if err.is_decode() {
            FetchError::Decode {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            convert_reqwest_error(&err, url.as_str(), timeout)
        }
    })
}

/// Parse a configured base URL, dropping any trailing slash.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|err| FetchError::InvalidUrl {
        url: raw.to_owned(),
        message: err.to_string(),
    })
}

/// Convert a reqwest error into a [`FetchError`].
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return FetchError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    FetchError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}
