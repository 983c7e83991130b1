use engine_core::{Rgb, WeatherKind};
use renderer::{PointsMaterial, SceneBackend};

use super::scaled_count;
use crate::particles::ParticleSpawn;
use crate::system::WeatherSystem;

impl<S: SceneBackend> WeatherSystem<S> {
    pub(crate) fn enable_snow(&mut self, f: f32) {
        let count = scaled_count(300.0, 1200.0, f);
        let spawn = ParticleSpawn::snow(&mut self.rng, count, 0.02 + f * 0.05);
        self.spawn_particles(spawn, PointsMaterial::new(Rgb::WHITE, 0.2, 0.6 + f * 0.3));
        self.set_ambient_intensity(0.7);
        self.request_ambience(WeatherKind::Snow);
    }
}
