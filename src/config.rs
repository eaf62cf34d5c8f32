//! Configuration management for `WeatherCard`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherCardError;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `WeatherCard`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherCardConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Where to look when no city is given
    #[serde(default)]
    pub location: LocationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Card display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key. Not checked for presence: upstream answers 401 without it
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Location resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// IP geolocation endpoint used when nothing else is known
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,
    /// City used instead of geolocation
    pub default_city: Option<String>,
    /// Fixed latitude used instead of geolocation
    pub latitude: Option<f64>,
    /// Fixed longitude used instead of geolocation
    pub longitude: Option<f64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Card display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of aggregated days shown on the card
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    /// IANA zone used for weekday names; the host zone when unset
    pub timezone: Option<String>,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_geolocation_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_forecast_days() -> u32 {
    5
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            geolocation_url: default_geolocation_url(),
            default_city: None,
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            forecast_days: default_forecast_days(),
            timezone: None,
        }
    }
}

impl LocationConfig {
    /// Fixed coordinates, when both halves are configured
    pub fn fixed_coordinates(&self) -> crate::Result<Option<Coordinates>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).map(Some),
            (None, None) => Ok(None),
            _ => Err(WeatherCardError::config(
                "location.latitude and location.longitude must be set together",
            )),
        }
    }
}

impl DisplayConfig {
    /// Parsed display time zone
    pub fn time_zone(&self) -> crate::Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>().map_err(|_| {
                    WeatherCardError::config(format!("Unknown time zone '{name}'"))
                })
            })
            .transpose()
    }
}

impl WeatherCardConfig {
    /// Load configuration from `config_path`, or the default location, then
    /// environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERCARD_WEATHER__API_KEY -> weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERCARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherCardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weathercard").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.location.geolocation_url.is_empty() {
            self.location.geolocation_url = default_geolocation_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.display.forecast_days == 0 {
            self.display.forecast_days = default_forecast_days();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.location.fixed_coordinates()?;
        self.display.time_zone()?;
        Ok(())
    }

    /// An absent key is allowed, an empty one is a mistake
    pub fn validate_api_key(&self) -> crate::Result<()> {
        if let Some(api_key) = &self.weather.api_key
            && api_key.trim().is_empty()
        {
            return Err(WeatherCardError::config(
                "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
            ));
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(WeatherCardError::config(
                "Weather API timeout cannot exceed 300 seconds",
            ));
        }

        if !(1..=7).contains(&self.display.forecast_days) {
            return Err(WeatherCardError::config(
                "display.forecast_days must be between 1 and 7",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherCardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherCardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("Weather API base URL", &self.weather.base_url),
            ("Geolocation URL", &self.location.geolocation_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherCardError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}
