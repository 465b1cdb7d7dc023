//! Blocking [`Geocoder`] over the LocationIQ HTTP API.

use std::time::Duration;

use geo::Coord;
use lightscore_core::{Address, GeocodeError, Geocoder};
use log::{debug, info};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::locationiq::{error_message, first_location};

/// Errors raised while constructing a [`LocationIqGeocoder`].
#[derive(Debug, Error)]
pub enum GeocoderBuildError {
    /// The API key was empty.
    #[error("geocoder API key must not be empty")]
    MissingKey,
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Public LocationIQ endpoint.
pub const DEFAULT_BASE_URL: &str = "https://us1.locationiq.com";

/// Default user agent for geocoding requests.
pub const DEFAULT_USER_AGENT: &str = "lightscore-geocoder/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

const SEARCH_PATH: &str = "/v1/search.php";

/// Configuration for [`LocationIqGeocoder`].
#[derive(Clone)]
pub struct LocationIqConfig {
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Service root, e.g. `"https://us1.locationiq.com"`.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl std::fmt::Debug for LocationIqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationIqConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl LocationIqConfig {
    /// Configuration for the public endpoint using `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point at another LocationIQ-compatible service.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Geocoder backed by LocationIQ's forward search.
///
/// Each lookup issues one `GET {base_url}/v1/search.php` with
/// `format=json&limit=1` and takes the first match. There are no retries.
///
/// Outside a Tokio runtime, or inside a `current_thread` runtime, requests run
/// on a runtime owned by the geocoder. Inside a multi-threaded runtime they
/// run on the caller's runtime via [`tokio::task::block_in_place`].
pub struct LocationIqGeocoder {
    client: Client,
    config: LocationIqConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for LocationIqGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationIqGeocoder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LocationIqGeocoder {
    /// Geocoder for the public endpoint.
    ///
    /// # Errors
    /// Fails when the key is empty or the client or runtime cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GeocoderBuildError> {
        Self::with_config(LocationIqConfig::new(api_key))
    }

    /// Geocoder with explicit configuration.
    ///
    /// # Errors
    /// Fails when the key is empty or the client or runtime cannot be built.
    pub fn with_config(config: LocationIqConfig) -> Result<Self, GeocoderBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(GeocoderBuildError::MissingKey);
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(GeocoderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(GeocoderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Search endpoint without credentials, safe to log and report.
    fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.config.base_url.trim_end_matches('/'))
    }

    async fn locate_async(&self, query: &str) -> Result<Coord<f64>, GeocodeError> {
        let url = self.search_url();
        debug!("geocoding {query:?} via {url}");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &url))?;
        self.convert_response(status, &body, query, &url)
    }

    /// Map a response to a location or a typed failure.
    ///
    /// LocationIQ answers 404 when nothing matches, which is "not found"
    /// rather than an upstream fault.
    fn convert_response(
        &self,
        status: StatusCode,
        body: &str,
        query: &str,
        url: &str,
    ) -> Result<Coord<f64>, GeocodeError> {
        if status == StatusCode::NOT_FOUND {
            return Err(GeocodeError::NotFound {
                address: query.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(GeocodeError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error_message(body),
            });
        }
        first_location(body, query)
    }

    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> GeocodeError {
        // reqwest messages embed the full query string, API key included.
        let error = error.without_url();
        if error.is_timeout() {
            return GeocodeError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return GeocodeError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        if error.is_decode() || error.is_body() {
            return GeocodeError::ParseError {
                message: error.to_string(),
            };
        }
        GeocodeError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl Geocoder for LocationIqGeocoder {
    fn locate(&self, address: &Address) -> Result<Coord<f64>, GeocodeError> {
        let query = address.to_string();
        let future = self.locate_async(&query);
        let outcome = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        };
        if let Ok(location) = &outcome {
            info!("geocoded {query:?} to ({}, {})", location.y, location.x);
        }
        outcome
    }
}
