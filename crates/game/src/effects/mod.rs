//! Per-kind weather effects. Each `enable_*` builds its own resources on a
//! freshly cleared scene and asks for the matching ambience.

mod clear;
mod cloudy;
mod fog;
mod rain;
mod snow;
mod thunderstorm;
mod windy;

pub use fog::FOG_COLOR;
pub use rain::{rain_count, RainStyle};

use engine_core::WeatherKind;
use renderer::{PointsMaterial, SceneBackend};

use crate::clouds::{CloudRequest, CloudStyle};
use crate::particles::ParticleSpawn;
use crate::system::WeatherSystem;

/// `⌊base + span·f⌋`, the particle and cloud count formula every effect uses.
pub fn scaled_count(base: f32, span: f32, f: f32) -> usize {
    (base + span * f.clamp(0.0, 1.0)).floor() as usize
}

impl<S: SceneBackend> WeatherSystem<S> {
    /// Build the effect for `kind` at the stored intensity.
    pub(crate) fn enable(&mut self, kind: WeatherKind) {
        let f = self.intensity.fraction();
        match kind {
            WeatherKind::Clear => self.enable_clear(f),
            WeatherKind::Cloudy => self.enable_cloudy(f),
            WeatherKind::Rain => self.enable_rain(f),
            WeatherKind::Thunderstorm => self.enable_thunderstorm(f),
            WeatherKind::Snow => self.enable_snow(f),
            WeatherKind::Fog => self.enable_fog(f),
            WeatherKind::Windy => self.enable_windy(f),
        }
    }

    /// Register a particle field with the scene. Replaces nothing: the
    /// controller has already released the previous field.
    pub(crate) fn spawn_particles(&mut self, spawn: ParticleSpawn, material: PointsMaterial) {
        debug_assert!(self.particles.is_none());
        let handle = self.scene.add_points(&spawn.positions, material);
        self.particles = Some(spawn.into_field(handle));
    }

    /// Ask for one cloud model per cloud; they appear as the loads complete.
    pub(crate) fn request_clouds(&mut self, kind: WeatherKind, f: f32) {
        let Some(style) = CloudStyle::for_kind(kind, f) else {
            return;
        };
        for _ in 0..style.count {
            let ticket = self.scene.request_model(&self.settings.cloud_model);
            self.cloud_requests.insert(
                ticket,
                CloudRequest {
                    generation: self.generation,
                    style,
                },
            );
        }
    }

    pub(crate) fn request_ambience(&mut self, kind: WeatherKind) {
        self.sound.request(kind, self.intensity);
    }
}
