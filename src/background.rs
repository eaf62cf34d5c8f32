//! Condition-dependent background artwork for the weather card

use serde::{Deserialize, Serialize};
use std::fmt;

/// Background shown behind the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Sunny,
    Rainy,
    Cloudy,
    /// Anything the upstream vocabulary has no dedicated artwork for
    #[default]
    Neutral,
}

impl Background {
    /// Pick the background for an upstream condition label.
    ///
    /// Labels are matched exactly: `Clear`, `Rain` and `Clouds`.
    #[must_use]
    pub fn for_condition(label: Option<&str>) -> Self {
        match label {
            Some("Clear") => Background::Sunny,
            Some("Rain") => Background::Rainy,
            Some("Clouds") => Background::Cloudy,
            _ => Background::Neutral,
        }
    }

    /// Image asset to display
    #[must_use]
    pub fn asset(&self) -> &'static str {
        match self {
            Background::Sunny => "sunny_day.jpeg",
            Background::Rainy => "rainy_image.jpeg",
            // the card has no neutral artwork and falls back to the cloudy one
            Background::Cloudy | Background::Neutral => "cloudy_image.webp",
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Background::Sunny => "sunny",
            Background::Rainy => "rainy",
            Background::Cloudy => "cloudy",
            Background::Neutral => "neutral",
        };
        f.write_str(name)
    }
}
