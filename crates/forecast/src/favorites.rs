//! Favorite cities, persisted as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ForecastError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    cities: Vec<String>,
}

impl Favorites {
    /// Load from `path`. If the file is missing or invalid, returns an empty list.
    pub fn load(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(f) => return f,
                Err(e) => log::warn!("Invalid favorites at {:?}: {}, starting empty", path, e),
            }
        }
        Self::default()
    }

    pub fn save(&self, path: &Path) -> Result<(), ForecastError> {
        let s = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, s).map_err(|source| ForecastError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Add `city`; returns false if it was already a favorite.
    pub fn add(&mut self, city: &str) -> bool {
        if self.contains(city) {
            return false;
        }
        self.cities.push(city.to_string());
        true
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cities.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
