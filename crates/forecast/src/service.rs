//! Resolving a city name to a weather report.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::cities::{find_city, normalize};
use crate::error::ForecastError;
use crate::open_meteo::{parse_forecast, WeatherReport};

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub place: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Turns a place name into coordinates. `Ok(None)` means no match.
pub trait Geocoder {
    fn locate(&mut self, query: &str) -> Result<Option<Location>, ForecastError>;
}

/// Returns the raw Open-Meteo body for a location.
pub trait ForecastSource {
    fn current(&mut self, location: &Location) -> Result<String, ForecastError>;
}

/// City lookup with a per-session location cache.
pub struct WeatherService<G, F> {
    geocoder: G,
    source: F,
    cache: HashMap<String, Location>,
}

impl<G: Geocoder, F: ForecastSource> WeatherService<G, F> {
    pub fn new(geocoder: G, source: F) -> Self {
        Self {
            geocoder,
            source,
            cache: HashMap::new(),
        }
    }

    /// Popular-city match for `input`, falling back to the input itself.
    pub fn resolve_name(input: &str) -> String {
        find_city(input)
            .map(str::to_string)
            .unwrap_or_else(|| input.trim().to_string())
    }

    pub fn locate(&mut self, input: &str) -> Result<Location, ForecastError> {
        let name = Self::resolve_name(input);
        if let Some(location) = self.cache.get(&name) {
            return Ok(location.clone());
        }
        let location = self
            .geocoder
            .locate(&name)?
            .ok_or_else(|| ForecastError::CityNotFound(input.trim().to_string()))?;
        self.cache.insert(name, location.clone());
        Ok(location)
    }

    pub fn lookup(&mut self, input: &str) -> Result<WeatherReport, ForecastError> {
        if input.trim().is_empty() {
            return Err(ForecastError::EmptyQuery);
        }
        let location = self.locate(input)?;
        let body = self.source.current(&location)?;
        let response = parse_forecast(&location.place, &body)?;
        log::debug!(
            "Forecast for {} at ({}, {})",
            location.place,
            location.latitude,
            location.longitude
        );
        Ok(WeatherReport::from_response(location.place, response))
    }

    pub fn cached_locations(&self) -> usize {
        self.cache.len()
    }
}

#[derive(Deserialize)]
struct Coordinates {
    latitude: f64,
    longitude: f64,
}

/// Saved Open-Meteo responses, one `<city>.json` per city. The file stem is
/// the lowercase city name with everything but letters and digits dropped,
/// so a name can never reach outside `dir`.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    dir: PathBuf,
}

impl ArchiveSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        let stem: String = normalize(name).chars().filter(|c| c.is_alphanumeric()).collect();
        if stem.is_empty() {
            return None;
        }
        Some(self.dir.join(format!("{}.json", stem)))
    }

    fn read(&self, path: &Path) -> Result<String, ForecastError> {
        std::fs::read_to_string(path).map_err(|source| ForecastError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Geocoder for ArchiveSource {
    fn locate(&mut self, query: &str) -> Result<Option<Location>, ForecastError> {
        let path = match self.path_for(query) {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        };
        let coords: Coordinates = serde_json::from_str(&self.read(&path)?)?;
        Ok(Some(Location {
            place: query.to_string(),
            latitude: coords.latitude,
            longitude: coords.longitude,
        }))
    }
}

impl ForecastSource for ArchiveSource {
    fn current(&mut self, location: &Location) -> Result<String, ForecastError> {
        let path = self
            .path_for(&location.place)
            .ok_or_else(|| ForecastError::CityNotFound(location.place.clone()))?;
        self.read(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use engine_core::WeatherKind;

    const OSLO: &str = r#"{"latitude": 59.91, "longitude": 10.75,
        "current": {"temperature_2m": -3.0, "relative_humidity_2m": 90,
        "wind_speed_10m": 2.0, "rain": 0.0, "snowfall": 2.0,
        "weather_code": 73, "cloud_cover": 100}}"#;

    struct CountingGeocoder {
        calls: usize,
    }

    impl Geocoder for CountingGeocoder {
        fn locate(&mut self, query: &str) -> Result<Option<Location>, ForecastError> {
            self.calls += 1;
            if query == "Oslo" {
                Ok(Some(Location {
                    place: "Oslo, Norway".into(),
                    latitude: 59.91,
                    longitude: 10.75,
                }))
            } else {
                Ok(None)
            }
        }
    }

    struct FixedSource(&'static str);

    impl ForecastSource for FixedSource {
        fn current(&mut self, _location: &Location) -> Result<String, ForecastError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn lookup_builds_report_and_caches_location() {
        let mut service = WeatherService::new(CountingGeocoder { calls: 0 }, FixedSource(OSLO));
        let report = service.lookup("oslo").unwrap();
        assert_eq!(report.place, "Oslo, Norway");
        assert_eq!(report.condition, Condition::Snow);
        assert_eq!(report.scene_weather().0, WeatherKind::Snow);
        assert_eq!(report.scene_weather().1.value(), 60);

        service.lookup(" OSLO ").unwrap();
        assert_eq!(service.geocoder.calls, 1);
        assert_eq!(service.cached_locations(), 1);
    }

    #[test]
    fn empty_and_unknown_queries_fail() {
        let mut service = WeatherService::new(CountingGeocoder { calls: 0 }, FixedSource(OSLO));
        assert!(matches!(service.lookup("   "), Err(ForecastError::EmptyQuery)));
        match service.lookup("Atlantis") {
            Err(ForecastError::CityNotFound(name)) => assert_eq!(name, "Atlantis"),
            other => panic!("expected CityNotFound, got {:?}", other),
        }
        assert_eq!(service.cached_locations(), 0);
    }

    #[test]
    fn archive_serves_saved_responses() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("oslo.json"), OSLO).unwrap();
        let archive = ArchiveSource::new(dir.path());
        let mut service = WeatherService::new(archive.clone(), archive);

        let report = service.lookup("Oslo").unwrap();
        assert_eq!(report.place, "Oslo");
        assert!((report.latitude - 59.91).abs() < 1e-9);
        assert!(matches!(service.lookup("Gotham"), Err(ForecastError::CityNotFound(_))));
    }

    #[test]
    fn archive_names_stay_inside_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let reports = root.path().join("reports");
        std::fs::create_dir(&reports).unwrap();
        std::fs::write(root.path().join("secret.json"), OSLO).unwrap();
        std::fs::write(reports.join("stjohns.json"), OSLO).unwrap();
        let mut archive = ArchiveSource::new(&reports);

        assert_eq!(archive.locate("../secret").unwrap(), None);
        assert_eq!(archive.locate("../").unwrap(), None);
        assert_eq!(archive.locate("/").unwrap(), None);
        let found = archive.locate("St. John's").unwrap().unwrap();
        assert!((found.latitude - 59.91).abs() < 1e-9);

        let mut service = WeatherService::new(archive.clone(), archive);
        assert!(matches!(service.lookup("../secret"), Err(ForecastError::CityNotFound(_))));
        assert!(matches!(service.lookup("./.."), Err(ForecastError::CityNotFound(_))));
    }

    #[test]
    fn archive_with_error_body_reports_api_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tokyo.json"),
            r#"{"latitude": 35.7, "longitude": 139.7, "error": true, "reason": "rate limited"}"#,
        )
        .unwrap();
        let archive = ArchiveSource::new(dir.path());
        let mut service = WeatherService::new(archive.clone(), archive);
        assert!(matches!(service.lookup("Tokyo"), Err(ForecastError::Api { .. })));
    }
}
