//! Error types and handling for the `WeatherCard` application

use std::collections::HashMap;
use thiserror::Error;

/// Machine-readable classification of upstream API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The API rejected the credential (HTTP 401)
    ApiUnauthorized,
    /// The requested city or coordinates are unknown upstream (HTTP 404)
    ApiLocationNotFound,
    /// Upstream throttled the request (HTTP 429)
    ApiRateLimit,
    /// Transport failure, timeout or any other non-success status
    ApiNetworkError,
    /// Response body did not have the expected shape
    ApiInvalidResponse,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ApiUnauthorized => "API_UNAUTHORIZED",
            ErrorCode::ApiLocationNotFound => "API_LOCATION_NOT_FOUND",
            ErrorCode::ApiRateLimit => "API_RATE_LIMIT",
            ErrorCode::ApiNetworkError => "API_NETWORK_ERROR",
            ErrorCode::ApiInvalidResponse => "API_INVALID_RESPONSE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the `WeatherCard` application
#[derive(Error, Debug)]
pub enum WeatherCardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error [{code}]: {message}")]
    Api {
        message: String,
        code: ErrorCode,
        context: HashMap<String, String>,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Geolocation could not produce a position
    #[error("Location unavailable: {message}")]
    Location { message: String },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WeatherCardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error without extra context
    pub fn api<S: Into<String>>(message: S, code: ErrorCode) -> Self {
        Self::api_with_context(message, code, HashMap::new())
    }

    /// Create a new API error carrying key/value diagnostics
    pub fn api_with_context<S: Into<String>>(
        message: S,
        code: ErrorCode,
        context: HashMap<String, String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            code,
            context,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new geolocation error
    pub fn location<S: Into<String>>(message: S) -> Self {
        Self::Location {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// API error code, if this is an API error
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            WeatherCardError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherCardError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            WeatherCardError::Api { code, .. } => match code {
                ErrorCode::ApiUnauthorized => {
                    "The weather service rejected the API key.".to_string()
                }
                ErrorCode::ApiLocationNotFound => {
                    "Location not found. Please check the city name.".to_string()
                }
                ErrorCode::ApiRateLimit => {
                    "The weather service is throttling requests. Try again later.".to_string()
                }
                ErrorCode::ApiNetworkError => {
                    "Unable to reach the weather service. Please check your internet connection."
                        .to_string()
                }
                ErrorCode::ApiInvalidResponse => {
                    "The weather service returned data that could not be read.".to_string()
                }
            },
            WeatherCardError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherCardError::Location { .. } => {
                "Could not determine your location. Try --city instead.".to_string()
            }
            WeatherCardError::General { message } => message.clone(),
        }
    }
}
