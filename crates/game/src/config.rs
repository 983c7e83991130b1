//! Application configuration (startup weather, loop rate, asset paths). Loaded from fogbound.ron at startup.

use engine_core::{Intensity, WeatherKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lightning::LightningTuning;

/// Persistent settings. Loaded from `fogbound.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather shown before any command or lookup.
    #[serde(default = "default_initial_weather")]
    pub initial_weather: WeatherKind,
    #[serde(default)]
    pub initial_intensity: Intensity,
    /// Frame loop rate.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64,
    /// Stop after this many seconds; 0 runs until `quit`.
    #[serde(default)]
    pub run_seconds: f64,
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: PathBuf,
    /// Saved Open-Meteo responses, one `<city>.json` each.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
    #[serde(default = "default_favorites_path")]
    pub favorites_path: PathBuf,
    #[serde(default = "default_house_model")]
    pub house_model: String,
    #[serde(default = "default_cloud_model")]
    pub cloud_model: String,
    /// Play ambient weather tracks.
    #[serde(default = "default_true")]
    pub audio: bool,
    #[serde(default)]
    pub lightning: LightningTuning,
}

fn default_initial_weather() -> WeatherKind {
    WeatherKind::Rain
}
fn default_tick_rate() -> f64 {
    60.0
}
fn default_sounds_dir() -> PathBuf {
    PathBuf::from("sounds")
}
fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}
fn default_favorites_path() -> PathBuf {
    PathBuf::from("favorites.ron")
}
fn default_house_model() -> String {
    "models/forest_house.glb".to_string()
}
fn default_cloud_model() -> String {
    "models/cloud_test.glb".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_weather: default_initial_weather(),
            initial_intensity: Intensity::default(),
            tick_rate_hz: default_tick_rate(),
            run_seconds: 0.0,
            sounds_dir: default_sounds_dir(),
            reports_dir: default_reports_dir(),
            favorites_path: default_favorites_path(),
            house_model: default_house_model(),
            cloud_model: default_cloud_model(),
            audio: default_true(),
            lightning: LightningTuning::default(),
        }
    }
}

impl AppConfig {
    /// Load config from `fogbound.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Write `fogbound.ron` if it does not exist yet, so there is a file to edit.
    pub fn save_if_missing(&self) {
        let path = config_path();
        if !path.exists() {
            log::info!("Writing default config to {:?}", path);
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("fogbound.ron")
}
