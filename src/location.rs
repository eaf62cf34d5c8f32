//! Location Resolution Module
//!
//! Turns user input or the host's position into a [`LocationQuery`] for the
//! weather API. Device geolocation is abstracted behind [`PositionProvider`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{Coordinates, LocationQuery};
use crate::{Result, WeatherCardError};

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Parse location input: `"lat,lon"`, `"lat lon"` or a city name.
    ///
    /// Out-of-range coordinates fall through to a city name, the weather API
    /// decides whether it knows them. Blank input is rejected.
    pub fn parse(input: &str) -> Result<LocationQuery> {
        let input = input.trim();

        if input.is_empty() {
            return Err(WeatherCardError::validation("Location cannot be empty"));
        }

        if let Some(coords) = Self::parse_coordinates(input) {
            return Ok(LocationQuery::Coordinates(coords));
        }

        Ok(LocationQuery::City(input.to_string()))
    }

    fn parse_coordinates(input: &str) -> Option<Coordinates> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return None;
        };

        let lat = lat.parse::<f64>().ok()?;
        let lon = lon.parse::<f64>().ok()?;
        Coordinates::new(lat, lon).ok()
    }
}

/// Source of the device's current position
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Current coordinates. Permission, availability and timeout failures
    /// all surface as [`WeatherCardError::Location`].
    async fn current_position(&self) -> Result<Coordinates>;
}

/// Position known up front, from configuration or flags
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// Approximate position from the public IP address
#[derive(Debug, Clone)]
pub struct IpGeolocation {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

impl IpGeolocation {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("WeatherCard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherCardError::general(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PositionProvider for IpGeolocation {
    async fn current_position(&self) -> Result<Coordinates> {
        debug!("Requesting IP geolocation from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| WeatherCardError::location(format!("Geolocation request failed: {e}")))?;

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherCardError::location(format!("Invalid geolocation response: {e}")))?;

        if body.status != "success" {
            return Err(WeatherCardError::location(
                body.message
                    .unwrap_or_else(|| "geolocation service refused the request".to_string()),
            ));
        }

        let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
            return Err(WeatherCardError::location(
                "Geolocation response has no coordinates",
            ));
        };

        let coords = Coordinates::new(lat, lon)
            .map_err(|e| WeatherCardError::location(e.to_string()))?;
        info!(
            "User location: {} ({})",
            coords.format_coordinates(),
            body.city.as_deref().unwrap_or("unknown city")
        );

        Ok(coords)
    }
}

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Explicit input wins; otherwise ask the position provider
    pub async fn resolve(
        input: Option<&str>,
        provider: &dyn PositionProvider,
    ) -> Result<LocationQuery> {
        let query = match input {
            Some(text) => LocationParser::parse(text)?,
            None => LocationQuery::Coordinates(provider.current_position().await?),
        };

        debug!("Resolved location: {}", query);
        Ok(query)
    }
}
