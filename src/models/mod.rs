//! Data models for the WeatherCard application
//!
//! This module contains the core domain models organized by concern:
//! - Location: coordinates and the query sent upstream
//! - Weather: the current-conditions snapshot and temperature helpers
//! - Forecast: raw forecast samples and the per-day aggregates built from them

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DailyForecast, RawForecastSample, RawForecastSeries, WeatherReport};
pub use location::{Coordinates, LocationQuery};
pub use weather::{Condition, CurrentConditions, kelvin_to_celsius, round_hundredths};
