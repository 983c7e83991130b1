//! Commands and forecast lookups applied to the weather system.

use std::path::PathBuf;

use forecast::{suggestions, Favorites, ForecastSource, Geocoder, WeatherReport, WeatherService};
use renderer::SceneBackend;

use crate::commands::{Command, HELP};
use crate::system::WeatherSystem;

/// What the prompt should print, and whether to stop.
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }
}

pub struct App<S: SceneBackend, G, F> {
    pub system: WeatherSystem<S>,
    service: WeatherService<G, F>,
    favorites: Favorites,
    favorites_path: PathBuf,
    /// Place of the last successful lookup; what `fav add` saves.
    current_place: Option<String>,
}

impl<S: SceneBackend, G: Geocoder, F: ForecastSource> App<S, G, F> {
    pub fn new(system: WeatherSystem<S>, service: WeatherService<G, F>, favorites_path: PathBuf) -> Self {
        let favorites = Favorites::load(&favorites_path);
        Self {
            system,
            service,
            favorites,
            favorites_path,
            current_place: None,
        }
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Parse and apply one line. Every line counts as a user interaction.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        self.system.notify_interaction();
        match Command::parse(line) {
            Ok(command) => self.handle(command),
            Err(e) => Reply::line(e.to_string()),
        }
    }

    pub fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::Weather(name) => {
                let intensity = self.system.intensity();
                if self.system.set_weather_by_name(&name, intensity) {
                    Reply::line(format!("weather: {} at {}", name, intensity))
                } else {
                    Reply::line(format!("unknown weather {:?}", name))
                }
            }
            Command::Intensity(intensity) => match self.system.kind() {
                Some(kind) => {
                    self.system.set_intensity(intensity);
                    Reply::line(format!("weather: {} at {}", kind, intensity))
                }
                None => Reply::line("no weather to adjust yet"),
            },
            Command::City(name) => self.lookup(&name),
            Command::Suggest(text) => {
                let matches = suggestions(&text);
                if matches.is_empty() {
                    Reply::line("no suggestions")
                } else {
                    Reply::line(matches.join(", "))
                }
            }
            Command::FavoriteAdd => self.add_favorite(),
            Command::FavoriteList => {
                if self.favorites.is_empty() {
                    return Reply::line("no favorites yet");
                }
                Reply {
                    lines: self
                        .favorites
                        .iter()
                        .enumerate()
                        .map(|(i, city)| format!("{}. {}", i + 1, city))
                        .collect(),
                    quit: false,
                }
            }
            Command::FavoriteSelect(n) => {
                let city = n.checked_sub(1).and_then(|i| self.favorites.get(i)).map(str::to_string);
                match city {
                    Some(city) => self.lookup(&city),
                    None => Reply::line(format!("no favorite #{}", n)),
                }
            }
            Command::Status => Reply {
                lines: self.status(),
                quit: false,
            },
            Command::Help => Reply::line(HELP),
            Command::Quit => Reply {
                lines: Vec::new(),
                quit: true,
            },
        }
    }

    /// Look up a city and show its weather. Failures leave the scene as it was.
    pub fn lookup(&mut self, city: &str) -> Reply {
        match self.service.lookup(city) {
            Ok(report) => {
                let lines = self.apply_report(&report);
                Reply { lines, quit: false }
            }
            Err(e) => {
                log::warn!("Lookup for {:?} failed: {}", city, e);
                Reply::line(format!("error: {}", e))
            }
        }
    }

    fn apply_report(&mut self, report: &WeatherReport) -> Vec<String> {
        let (kind, intensity) = report.scene_weather();
        self.system.set_weather(kind, intensity);
        self.current_place = Some(report.place.clone());
        vec![
            report.to_string(),
            format!("scene: {} at {}", kind, intensity),
        ]
    }

    fn add_favorite(&mut self) -> Reply {
        let Some(place) = self.current_place.clone() else {
            return Reply::line("look up a city first");
        };
        if !self.favorites.add(&place) {
            return Reply::line(format!("{} is already in favorites", place));
        }
        if let Err(e) = self.favorites.save(&self.favorites_path) {
            log::warn!("Could not save favorites: {}", e);
            return Reply::line(format!("{} added, but not saved: {}", place, e));
        }
        Reply::line(format!("{} added to favorites", place))
    }

    fn status(&self) -> Vec<String> {
        let census = self.system.census();
        let sound = self.system.sound();
        let weather = self
            .system
            .kind()
            .map_or_else(|| "none".to_string(), |k| k.to_string());
        vec![
            format!(
                "weather: {} at {} (generation {})",
                weather,
                self.system.intensity(),
                self.system.generation()
            ),
            format!(
                "particles: {}, clouds: {} (+{} loading), bolts: {}, rig lights: {}",
                census.particles, census.clouds, census.pending_clouds, census.bolts, census.rig_lights
            ),
            format!(
                "audio: {}{}",
                sound.current().map_or("silent", |k| k.name()),
                sound
                    .pending()
                    .map(|p| format!(" (waiting for input: {})", p.kind))
                    .unwrap_or_default()
            ),
            format!("strikes: {}", self.system.stats().strikes),
        ]
    }
}
