//! Open-Meteo "current conditions" responses.

use engine_core::{Intensity, WeatherKind};
use serde::Deserialize;
use std::fmt;

use crate::condition::{compute_intensity, map_condition, Condition, Readings};
use crate::error::ForecastError;

/// Wind speed above which an otherwise clear sky is shown as windy.
pub const WINDY_THRESHOLD: f32 = 5.0;

/// Current-conditions block of a forecast response. Missing fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub temperature_2m: f32,
    pub relative_humidity_2m: f32,
    pub wind_speed_10m: f32,
    pub rain: f32,
    pub snowfall: f32,
    pub cloud_cover: f32,
    pub weather_code: u16,
}

impl CurrentConditions {
    pub fn readings(&self) -> Readings {
        Readings {
            cloud_cover: self.cloud_cover,
            rain: self.rain,
            snowfall: self.snowfall,
            wind_speed: self.wind_speed_10m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub current: CurrentConditions,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: String,
}

/// Parse a response body; error bodies (`{"error": true, "reason": ...}`)
/// become `ForecastError::Api`.
pub fn parse_forecast(city: &str, body: &str) -> Result<ForecastResponse, ForecastError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if let Ok(ApiErrorBody { error: true, reason }) = ApiErrorBody::deserialize(&value) {
        return Err(ForecastError::Api {
            city: city.to_string(),
            reason,
        });
    }
    Ok(ForecastResponse::deserialize(value)?)
}

/// WMO weather code to condition. Clear skies with wind above
/// `WINDY_THRESHOLD` are reported as windy.
pub fn condition_from_code(code: u16, wind_speed: f32) -> Condition {
    let condition = match code {
        1..=3 => Condition::Clouds,
        61 | 63 | 65 | 66 | 67 => Condition::Rain,
        71 | 73 | 75 | 77 => Condition::Snow,
        95 | 96 | 99 => Condition::Thunderstorm,
        45 | 48 => Condition::Fog,
        _ => Condition::Clear,
    };
    if condition == Condition::Clear && wind_speed > WINDY_THRESHOLD {
        Condition::Windy
    } else {
        condition
    }
}

/// Weather resolved for one place.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub place: String,
    pub latitude: f64,
    pub longitude: f64,
    pub condition: Condition,
    pub current: CurrentConditions,
}

impl WeatherReport {
    pub fn from_response(place: impl Into<String>, response: ForecastResponse) -> Self {
        let condition =
            condition_from_code(response.current.weather_code, response.current.wind_speed_10m);
        Self {
            place: place.into(),
            latitude: response.latitude,
            longitude: response.longitude,
            condition,
            current: response.current,
        }
    }

    /// Weather kind and intensity the scene should show for this report.
    pub fn scene_weather(&self) -> (WeatherKind, Intensity) {
        let main = self.condition.main();
        (
            map_condition(main, main),
            compute_intensity(self.condition, &self.current.readings()),
        )
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}): {}, {}°C, humidity {}%, wind {} m/s",
            self.place,
            self.latitude,
            self.longitude,
            self.condition,
            self.current.temperature_2m.round(),
            self.current.relative_humidity_2m,
            self.current.wind_speed_10m,
        )
    }
}
