//! Mapping reported conditions to scene weather, and how strong it should be.

use engine_core::{Intensity, WeatherKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intensity used when a condition is not recognised.
pub const DEFAULT_INTENSITY: Intensity = Intensity::clamped(50);

/// Condition as reported by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Fog,
    Windy,
}

impl Condition {
    pub fn main(self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Fog => "Fog",
            Condition::Windy => "Windy",
        }
    }

    /// Parse a condition name; "mist" is reported as fog.
    pub fn from_main(main: &str) -> Option<Self> {
        match main.trim().to_ascii_lowercase().as_str() {
            "clear" => Some(Condition::Clear),
            "clouds" => Some(Condition::Clouds),
            "rain" => Some(Condition::Rain),
            "snow" => Some(Condition::Snow),
            "thunderstorm" => Some(Condition::Thunderstorm),
            "fog" | "mist" => Some(Condition::Fog),
            "windy" => Some(Condition::Windy),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.main())
    }
}

/// Raw measurements an intensity is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    /// Cloud cover, percent.
    pub cloud_cover: f32,
    /// Rain in the last hour, mm.
    pub rain: f32,
    /// Snowfall in the last hour, mm.
    pub snowfall: f32,
    /// Wind speed at 10 m.
    pub wind_speed: f32,
}

/// Scene weather for a reported condition `main` and its description `desc`.
///
/// Heavy or extreme rain is shown as a thunderstorm. Anything unrecognised is
/// shown as clear.
pub fn map_condition(main: &str, desc: &str) -> WeatherKind {
    let main = main.to_lowercase();
    let desc = desc.to_lowercase();

    match main.as_str() {
        "thunderstorm" => WeatherKind::Thunderstorm,
        "drizzle" | "rain" => {
            if desc.contains("heavy") || desc.contains("extreme") {
                WeatherKind::Thunderstorm
            } else {
                WeatherKind::Rain
            }
        }
        "snow" => WeatherKind::Snow,
        "mist" | "fog" | "haze" => WeatherKind::Fog,
        "clouds" => WeatherKind::Cloudy,
        "windy" => WeatherKind::Windy,
        _ => WeatherKind::Clear,
    }
}

/// Intensity for a condition, always within [0, 100] whatever the readings.
pub fn compute_intensity(condition: Condition, readings: &Readings) -> Intensity {
    let Readings {
        cloud_cover,
        rain,
        snowfall,
        wind_speed,
    } = *readings;

    let raw = match condition {
        Condition::Thunderstorm => (70.0 + rain * 5.0).min(100.0),
        Condition::Rain => (40.0 + rain * 10.0).min(90.0),
        Condition::Snow => (40.0 + snowfall * 10.0).min(90.0),
        Condition::Clouds => (30.0 + cloud_cover * 0.7).min(90.0),
        Condition::Fog => (50.0 + cloud_cover * 0.5).min(90.0),
        Condition::Windy => (wind_speed / 50.0 * 100.0).clamp(0.0, 100.0),
        Condition::Clear => (100.0 - cloud_cover).max(20.0),
    };
    Intensity::from_f32(raw)
}

/// Intensity for a condition given by name; unknown names get `DEFAULT_INTENSITY`.
pub fn intensity_for_main(main: &str, readings: &Readings) -> Intensity {
    Condition::from_main(main)
        .map(|condition| compute_intensity(condition, readings))
        .unwrap_or(DEFAULT_INTENSITY)
}
