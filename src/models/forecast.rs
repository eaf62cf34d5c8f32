//! Forecast models: raw three-hourly samples and per-day aggregates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Condition, CurrentConditions};
use crate::background::Background;

/// One sampling-interval observation from the forecast endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawForecastSample {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Temperature in Kelvin
    pub temperature_kelvin: f64,
    pub condition: Condition,
}

impl RawForecastSample {
    #[must_use]
    pub fn new(timestamp: i64, temperature_kelvin: f64, condition: Condition) -> Self {
        Self {
            timestamp,
            temperature_kelvin,
            condition,
        }
    }

    /// Sample time as a UTC instant, `None` if outside chrono's range
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Chronological forecast samples as delivered by the weather API
pub type RawForecastSeries = Vec<RawForecastSample>;

/// One aggregated day of forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    /// Weekday name, e.g. "Monday"
    pub day: String,
    /// Mean temperature in Celsius, rounded to two decimals
    pub temperature_celsius: f64,
    /// Condition of the first sample seen for this day
    pub condition: Condition,
}

impl DailyForecast {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.2}°C", self.temperature_celsius)
    }
}

/// Everything one fetch produces for the card
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecast>,
    pub background: Background,
    /// When this report was retrieved
    pub retrieved_at: DateTime<Utc>,
}

impl WeatherReport {
    /// Build a report, choosing the background from the current condition
    #[must_use]
    pub fn new(current: CurrentConditions, daily: Vec<DailyForecast>) -> Self {
        let background = Background::for_condition(Some(&current.condition.label));
        Self {
            current,
            daily,
            background,
            retrieved_at: Utc::now(),
        }
    }
}
