//! Current-conditions model and temperature helpers

use serde::{Deserialize, Serialize};

/// Offset between the Kelvin and Celsius scales
pub const KELVIN_OFFSET: f64 = 273.15;

/// Convert temperature from Kelvin to Celsius
#[must_use]
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Round to two decimal places, halves away from zero
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Categorical label plus free-text description, e.g. `Rain` / `light rain`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Condition {
    pub label: String,
    pub description: String,
}

impl Condition {
    #[must_use]
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }

    /// Description with each word capitalized, the way the card shows it
    #[must_use]
    pub fn format_description(&self) -> String {
        capitalize_words(&self.description)
    }
}

/// Snapshot of the weather right now at the resolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Location name as reported by the weather API
    pub location_name: String,
    pub condition: Condition,
    /// Temperature in Kelvin, as received
    pub temperature_kelvin: f64,
}

impl CurrentConditions {
    /// Temperature in Celsius
    #[must_use]
    pub fn temperature_celsius(&self) -> f64 {
        kelvin_to_celsius(self.temperature_kelvin)
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.2}°C", self.temperature_celsius())
    }
}

fn capitalize_words(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start {
            result.extend(ch.to_uppercase());
        } else {
            result.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }
    result
}
