//! Live forecast provider client
//!
//! HTTP client for an OpenWeatherMap-style provider: a 5-day/3-hour
//! forecast endpoint and a current-conditions endpoint. Every failure
//! mode (missing key, transport error, timeout, non-success status,
//! undecodable body) collapses into `SourceUnavailable` so the resolver
//! has a single uniform fallback trigger. One attempt per request, no
//! retries.

use crate::config::WeatherConfig;
use crate::error::TripcastError;
use crate::models::openweather::{CurrentResponse, ForecastResponse};
use crate::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Client for the live forecast provider
#[derive(Debug, Clone)]
pub struct ForecastApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ForecastApiClient {
    /// Create a new provider client with the configured timeout.
    ///
    /// A missing API key is not an error here; it surfaces as
    /// `SourceUnavailable` on the first fetch so the caller falls back.
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("tripcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                TripcastError::source_unavailable(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the provider's 5-day/3-hour forecast for a named location.
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, city: &str) -> Result<ForecastResponse> {
        let key = self.require_key()?;
        let url = format!(
            "{}/forecast?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city),
            key
        );

        debug!("Requesting 5-day forecast for '{}'", city);
        let response: ForecastResponse = self.get_json(&url).await?;
        info!(
            "Received {} forecast samples for '{}' (utc offset {}s)",
            response.list.len(),
            city,
            response.city.timezone
        );
        Ok(response)
    }

    /// Fetch current conditions for a named location.
    #[instrument(skip(self))]
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentResponse> {
        let key = self.require_key()?;
        let url = format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city),
            key
        );

        debug!("Requesting current conditions for '{}'", city);
        self.get_json(&url).await
    }

    /// Whether a non-empty API key is configured
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn require_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TripcastError::source_unavailable("no weather API key configured"))
    }

    /// Single-attempt GET returning a decoded JSON body. The URL is
    /// never logged because it carries the API key.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Provider request failed: {}", e);
            TripcastError::source_unavailable(format!("provider request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Provider returned status {}", status);
            return Err(TripcastError::source_unavailable(format!(
                "provider returned status {status}"
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to decode provider response: {}", e);
            TripcastError::source_unavailable(format!("undecodable provider response: {e}"))
        })
    }
}
