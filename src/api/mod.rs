//! Weather API client for `OpenWeatherMap` integration
//!
//! Two read-only endpoints are used: `/weather` for the current snapshot and
//! `/forecast` for the three-hourly series. Requests are never retried; every
//! failure is mapped onto an [`ErrorCode`] and handed back to the caller.

pub mod openweather;

use chrono::Local;
use chrono_tz::Tz;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::aggregator::aggregate_daily_in;
use crate::config::WeatherConfig;
use crate::models::{CurrentConditions, LocationQuery, RawForecastSeries, WeatherReport};
use crate::{ErrorCode, Result, WeatherCardError};

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Weather API client for OpenWeatherMap
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    /// HTTP client
    client: Client,
    /// API configuration, including the credential
    config: WeatherConfig,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("WeatherCard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherCardError::general(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Configured per-request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds.into())
    }

    /// Get current conditions for a city or position
    #[instrument(skip(self), fields(query = %query))]
    pub async fn get_current_weather(&self, query: &LocationQuery) -> Result<CurrentConditions> {
        info!("Getting current weather for {}", query);
        let start_time = Instant::now();

        let response = self.make_request("weather", query).await?;
        let body: openweather::CurrentResponse = Self::parse_body(response, query).await?;
        let current = CurrentConditions::try_from(body)?;

        info!(
            "Retrieved current weather for '{}' in {:.3}s",
            current.location_name,
            start_time.elapsed().as_secs_f64()
        );

        Ok(current)
    }

    /// Get the raw three-hourly forecast for a city or position
    #[instrument(skip(self), fields(query = %query))]
    pub async fn get_forecast(&self, query: &LocationQuery) -> Result<RawForecastSeries> {
        info!("Getting forecast for {}", query);
        let start_time = Instant::now();

        let response = self.make_request("forecast", query).await?;
        let body: openweather::ForecastResponse = Self::parse_body(response, query).await?;
        let series = body.into_series()?;

        info!(
            "Retrieved forecast with {} data points in {:.3}s",
            series.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(series)
    }

    /// Fetch both endpoints and build the card's report.
    ///
    /// Weekday names are computed in `tz`, or the host zone when `None`.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn fetch_report(
        &self,
        query: &LocationQuery,
        tz: Option<Tz>,
    ) -> Result<WeatherReport> {
        let (current, series) =
            tokio::try_join!(self.get_current_weather(query), self.get_forecast(query))?;

        let daily = match tz {
            Some(tz) => aggregate_daily_in(&series, &tz),
            None => aggregate_daily_in(&series, &Local),
        };

        Ok(WeatherReport::new(current, daily))
    }

    /// Endpoint URL without the credential, safe to log
    fn endpoint_url(&self, endpoint: &str, query: &LocationQuery) -> String {
        format!(
            "{}/{}?{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint,
            query.to_query_params()
        )
    }

    async fn make_request(&self, endpoint: &str, query: &LocationQuery) -> Result<Response> {
        let url = self.endpoint_url(endpoint, query);
        debug!("OpenWeatherMap request URL: {}", url);

        let full_url = match &self.config.api_key {
            Some(key) => format!("{url}&appid={}", urlencoding::encode(key)),
            None => url.clone(),
        };

        let request_start = Instant::now();
        let response = self.client.get(&full_url).send().await.map_err(|e| {
            // reqwest errors print their URL, which carries the key
            let e = e.without_url();
            let kind = if e.is_timeout() { "Timed out" } else { "Network error" };
            warn!("{} requesting {}: {}", kind, url, e);
            WeatherCardError::api_with_context(
                format!("{kind} contacting the weather service: {e}"),
                ErrorCode::ApiNetworkError,
                HashMap::from([("endpoint".to_string(), endpoint.to_string())]),
            )
        })?;

        let elapsed = request_start.elapsed();
        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            elapsed.as_secs_f64()
        );

        if elapsed > SLOW_RESPONSE {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }

        if status.is_success() {
            return Ok(response);
        }

        let context = HashMap::from([
            ("endpoint".to_string(), endpoint.to_string()),
            ("status_code".to_string(), status.as_u16().to_string()),
            ("location".to_string(), query.to_string()),
        ]);

        let err = match status {
            StatusCode::UNAUTHORIZED => {
                error!("API authentication failed (HTTP 401)");
                WeatherCardError::api_with_context(
                    "Invalid API key. Please check your OpenWeatherMap API key.",
                    ErrorCode::ApiUnauthorized,
                    context,
                )
            }
            StatusCode::NOT_FOUND => {
                warn!("Location not found (HTTP 404): {}", query);
                WeatherCardError::api_with_context(
                    format!("Location not found: {query}"),
                    ErrorCode::ApiLocationNotFound,
                    context,
                )
            }
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Server rate limit exceeded (HTTP 429)");
                WeatherCardError::api_with_context(
                    "Rate limit exceeded by the weather service.",
                    ErrorCode::ApiRateLimit,
                    context,
                )
            }
            _ => {
                let message = format!(
                    "API request failed with status: {} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                );
                error!("{}", message);
                WeatherCardError::api_with_context(message, ErrorCode::ApiNetworkError, context)
            }
        };

        Err(err)
    }

    async fn parse_body<T: DeserializeOwned>(
        response: Response,
        query: &LocationQuery,
    ) -> Result<T> {
        let text = response.text().await.map_err(|e| {
            WeatherCardError::api(
                format!("Failed to read response body: {}", e.without_url()),
                ErrorCode::ApiNetworkError,
            )
        })?;

        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse weather response: {}", e);
            WeatherCardError::api_with_context(
                format!("Invalid weather data received from OpenWeatherMap: {e}"),
                ErrorCode::ApiInvalidResponse,
                HashMap::from([("location".to_string(), query.to_string())]),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn client(base_url: &str, api_key: Option<&str>) -> WeatherApiClient {
        WeatherApiClient::new(WeatherConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            timeout_seconds: 10,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_url_for_city() {
        let client = client("https://api.openweathermap.org/data/2.5/", Some("secret"));
        let url = client.endpoint_url("weather", &LocationQuery::City("New York".to_string()));
        assert_eq!(
            url,
            "https://api.openweathermap.org/data/2.5/weather?q=New%20York"
        );
        assert!(!url.contains("secret"));
    }

    #[test]
    fn test_endpoint_url_for_coordinates() {
        let client = client("http://localhost:8080", None);
        let query = LocationQuery::from(Coordinates::new(40.7, -74.0).unwrap());
        assert_eq!(
            client.endpoint_url("forecast", &query),
            "http://localhost:8080/forecast?lat=40.7&lon=-74"
        );
    }

    #[test]
    fn test_timeout_comes_from_config() {
        let client = client("http://localhost", None);
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }
}
