//! Weather kinds and intensity shared by the effect, audio and forecast crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven mutually exclusive weather modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    Clear,
    Cloudy,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
    Windy,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 7] = [
        WeatherKind::Clear,
        WeatherKind::Cloudy,
        WeatherKind::Rain,
        WeatherKind::Thunderstorm,
        WeatherKind::Snow,
        WeatherKind::Fog,
        WeatherKind::Windy,
    ];

    /// Lowercase name, as typed on the command surface and stored in config.
    pub fn name(self) -> &'static str {
        match self {
            WeatherKind::Clear => "clear",
            WeatherKind::Cloudy => "cloudy",
            WeatherKind::Rain => "rain",
            WeatherKind::Thunderstorm => "thunderstorm",
            WeatherKind::Snow => "snow",
            WeatherKind::Fog => "fog",
            WeatherKind::Windy => "windy",
        }
    }

    /// Kinds that populate the sky with clouds.
    pub fn has_clouds(self) -> bool {
        matches!(
            self,
            WeatherKind::Cloudy | WeatherKind::Rain | WeatherKind::Thunderstorm
        )
    }
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a weather name does not match any kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weather kind {0:?}")]
pub struct UnknownWeatherKind(pub String);

impl FromStr for WeatherKind {
    type Err = UnknownWeatherKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        WeatherKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| UnknownWeatherKind(s.to_string()))
    }
}

/// Weather severity in [0, 100]. Construction clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: Intensity = Intensity(0);
    pub const MAX: Intensity = Intensity(100);

    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub const fn clamped(value: u8) -> Self {
        Self(if value > 100 { 100 } else { value })
    }

    /// Round and clamp a computed value; NaN maps to zero.
    pub fn from_f32(value: f32) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// I / 100, the factor every per-kind formula is linear in.
    pub fn fraction(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(24)
    }
}

impl From<i64> for Intensity {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Intensity> for u8 {
    fn from(value: Intensity) -> Self {
        value.0
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
