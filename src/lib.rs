//! `WeatherCard` - current conditions and a daily forecast for your location
//!
//! This library resolves a location, fetches current conditions and the
//! three-hourly forecast from `OpenWeatherMap`, averages the forecast per
//! weekday and renders the result as a small card.

pub mod aggregator;
pub mod api;
pub mod background;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod models;
pub mod render;
pub mod session;

// Re-export core types for public API
pub use aggregator::{aggregate_daily, aggregate_daily_in};
pub use api::WeatherApiClient;
pub use background::Background;
pub use config::WeatherCardConfig;
pub use error::{ErrorCode, WeatherCardError};
pub use location::{FixedPosition, IpGeolocation, LocationParser, LocationResolver, PositionProvider};
pub use models::{
    Condition, Coordinates, CurrentConditions, DailyForecast, LocationQuery, RawForecastSample,
    RawForecastSeries, WeatherReport,
};
pub use session::{DisplayState, RequestOutcome, RequestTicket, WeatherSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherCardError>;
