//! Location model for geographic coordinates and upstream queries

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Result, WeatherCardError};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherCardError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherCardError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// What the weather API is asked about
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text city name, passed through unvalidated
    City(String),
    /// Device or user supplied position
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Query string fragment understood by the weather API, without the credential
    #[must_use]
    pub fn to_query_params(&self) -> String {
        match self {
            LocationQuery::City(name) => format!("q={}", urlencoding::encode(name)),
            LocationQuery::Coordinates(coords) => {
                format!("lat={}&lon={}", coords.latitude, coords.longitude)
            }
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(name) => write!(f, "{name}"),
            LocationQuery::Coordinates(coords) => write!(f, "{}", coords.format_coordinates()),
        }
    }
}

impl From<Coordinates> for LocationQuery {
    fn from(coords: Coordinates) -> Self {
        LocationQuery::Coordinates(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_range_validation() {
        assert!(Coordinates::new(46.8182, 8.2275).is_ok());
        assert!(Coordinates::new(91.0, 8.0).is_err());
        assert!(Coordinates::new(-91.0, 8.0).is_err());
        assert!(Coordinates::new(46.0, 181.0).is_err());
        assert!(Coordinates::new(46.0, -181.0).is_err());
    }

    #[test]
    fn test_city_query_is_percent_encoded() {
        let query = LocationQuery::City("São Paulo".to_string());
        assert_eq!(query.to_query_params(), "q=S%C3%A3o%20Paulo");
    }

    #[test]
    fn test_coordinate_query_params() {
        let query = LocationQuery::from(Coordinates::new(51.5, -0.12).unwrap());
        assert_eq!(query.to_query_params(), "lat=51.5&lon=-0.12");
        assert_eq!(query.to_string(), "51.5000, -0.1200");
    }
}
