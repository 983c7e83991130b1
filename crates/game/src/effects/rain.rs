use engine_core::{Rgb, WeatherKind};
use renderer::{PointsMaterial, SceneBackend};

use super::scaled_count;
use crate::particles::ParticleSpawn;
use crate::system::WeatherSystem;

/// Rain particle parameters; thunderstorms use a heavier variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainStyle {
    pub count: usize,
    pub fall_speed: f32,
    pub color: Rgb,
    pub size: f32,
    pub opacity: f32,
}

impl RainStyle {
    pub fn rain(f: f32) -> Self {
        Self {
            count: rain_count(f),
            fall_speed: 0.1 + f * 0.2,
            color: Rgb::from_hex(0xaaaaaa),
            size: 0.1,
            opacity: 0.4 + f * 0.4,
        }
    }

    pub fn storm(f: f32) -> Self {
        Self {
            count: scaled_count(800.0, 1700.0, f),
            fall_speed: 0.15 + f * 0.25,
            color: Rgb::from_hex(0x888888),
            size: 0.12,
            opacity: 0.5 + f * 0.4,
        }
    }
}

pub fn rain_count(f: f32) -> usize {
    scaled_count(500.0, 1500.0, f)
}

impl<S: SceneBackend> WeatherSystem<S> {
    pub(crate) fn spawn_rain(&mut self, style: RainStyle) {
        let spawn = ParticleSpawn::rain(&mut self.rng, style.count, style.fall_speed);
        self.spawn_particles(spawn, PointsMaterial::new(style.color, style.size, style.opacity));
    }

    pub(crate) fn enable_rain(&mut self, f: f32) {
        self.request_clouds(WeatherKind::Rain, f);
        self.spawn_rain(RainStyle::rain(f));
        self.set_ambient_intensity(0.5 - f * 0.2);
        self.request_ambience(WeatherKind::Rain);
    }
}
