//! Weather data for the scene: turning a city name into a weather kind and
//! intensity.
//!
//! Network access is not part of this crate. Locations and raw forecast
//! bodies come from a `Geocoder` and a `ForecastSource`; everything after
//! that (Open-Meteo parsing, condition mapping, intensity formulas, city
//! matching, favorites) is pure and lives here.

pub mod cities;
pub mod condition;
pub mod error;
pub mod favorites;
pub mod open_meteo;
pub mod service;

pub use cities::*;
pub use condition::*;
pub use error::*;
pub use favorites::*;
pub use open_meteo::*;
pub use service::*;
