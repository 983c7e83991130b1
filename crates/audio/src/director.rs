//! Track selection, volume and the first-interaction gate.

use engine_core::{Intensity, WeatherKind};

use crate::output::SoundOutput;

/// The thunderstorm recording opens with a long silence; playback skips it.
pub const THUNDERSTORM_START_OFFSET_SECS: f64 = 5.0;

/// File name of the looping ambience track for `kind`, if it has one.
pub fn track_file(kind: WeatherKind) -> Option<&'static str> {
    match kind {
        WeatherKind::Rain => Some("rain.mp3"),
        WeatherKind::Thunderstorm => Some("thunderstorm.mp3"),
        WeatherKind::Windy => Some("windy.mp3"),
        WeatherKind::Snow => Some("snow.mp3"),
        WeatherKind::Fog => Some("fog.mp3"),
        WeatherKind::Clear | WeatherKind::Cloudy => None,
    }
}

/// Track volume for an intensity: 0.3 at 0, 0.8 at 100.
pub fn volume_for(intensity: Intensity) -> f64 {
    0.3 + f64::from(intensity.fraction()) * 0.5
}

fn start_offset_for(kind: WeatherKind) -> f64 {
    if kind == WeatherKind::Thunderstorm {
        THUNDERSTORM_START_OFFSET_SECS
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSound {
    pub kind: WeatherKind,
    pub intensity: Intensity,
}

/// Owns the audible state of the weather ambience.
pub struct SoundDirector {
    output: Box<dyn SoundOutput>,
    user_has_interacted: bool,
    pending: Option<PendingSound>,
    current: Option<WeatherKind>,
}

impl SoundDirector {
    pub fn new(output: Box<dyn SoundOutput>) -> Self {
        Self {
            output,
            user_has_interacted: false,
            pending: None,
            current: None,
        }
    }

    /// Ambience for a freshly installed weather: silence for kinds without a
    /// track, otherwise that kind's loop.
    pub fn request(&mut self, kind: WeatherKind, intensity: Intensity) {
        if track_file(kind).is_some() {
            self.play_weather(kind, intensity);
        } else {
            self.stop_all();
        }
    }

    /// Play the loop for `kind`, stopping any other. Queued (latest wins)
    /// until the first user interaction.
    pub fn play_weather(&mut self, kind: WeatherKind, intensity: Intensity) {
        if track_file(kind).is_none() {
            return;
        }

        if !self.user_has_interacted {
            self.pending = Some(PendingSound { kind, intensity });
            return;
        }

        let volume = volume_for(intensity);
        if self.current == Some(kind) && kind != WeatherKind::Thunderstorm {
            self.output.set_volume(volume);
            return;
        }

        match self.output.start(kind, volume, start_offset_for(kind)) {
            Ok(()) => {
                log::debug!("Audio: {} at volume {:.2}", kind, volume);
                self.current = Some(kind);
            }
            Err(e) => {
                log::warn!("Audio: could not start {} ambience: {}", kind, e);
                self.current = None;
            }
        }
    }

    /// Silence everything and forget any queued request.
    pub fn stop_all(&mut self) {
        self.output.stop_all();
        self.current = None;
        self.pending = None;
    }

    /// Record a user interaction; the first one releases the queued request.
    pub fn notify_interaction(&mut self) {
        if self.user_has_interacted {
            return;
        }
        self.user_has_interacted = true;
        if let Some(pending) = self.pending.take() {
            self.play_weather(pending.kind, pending.intensity);
        }
    }

    pub fn current(&self) -> Option<WeatherKind> {
        self.current
    }

    pub fn pending(&self) -> Option<PendingSound> {
        self.pending
    }

    pub fn user_has_interacted(&self) -> bool {
        self.user_has_interacted
    }
}
