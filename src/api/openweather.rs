//! `OpenWeatherMap` 2.5 response structures and conversion utilities

use serde::Deserialize;

use crate::models::{Condition, CurrentConditions, RawForecastSample, RawForecastSeries};
use crate::{ErrorCode, Result, WeatherCardError};

/// Response of the `/weather` endpoint
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub name: String,
    pub weather: Vec<WeatherEntry>,
    pub main: MainData,
}

/// Response of the `/forecast` endpoint
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
}

/// One three-hourly forecast point
#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    /// Seconds since the Unix epoch
    pub dt: i64,
    pub main: MainData,
    pub weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MainData {
    /// Kelvin, the API default when no `units` parameter is sent
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct WeatherEntry {
    pub main: String,
    pub description: String,
}

fn first_condition(weather: &[WeatherEntry], what: &str) -> Result<Condition> {
    weather
        .first()
        .map(|entry| Condition::new(&entry.main, &entry.description))
        .ok_or_else(|| {
            WeatherCardError::api(
                format!("{what} has an empty weather array"),
                ErrorCode::ApiInvalidResponse,
            )
        })
}

impl TryFrom<CurrentResponse> for CurrentConditions {
    type Error = WeatherCardError;

    fn try_from(response: CurrentResponse) -> Result<Self> {
        let condition = first_condition(&response.weather, "Current weather response")?;
        Ok(CurrentConditions {
            location_name: response.name,
            condition,
            temperature_kelvin: response.main.temp,
        })
    }
}

impl ForecastResponse {
    /// Convert into the raw series, failing on any entry without a condition
    pub fn into_series(self) -> Result<RawForecastSeries> {
        self.list
            .into_iter()
            .map(|entry| {
                let condition = first_condition(&entry.weather, "Forecast entry")?;
                Ok(RawForecastSample::new(
                    entry.dt,
                    entry.main.temp,
                    condition,
                ))
            })
            .collect()
    }
}
