use engine_core::{Rgb, WeatherKind};
use renderer::{PointsMaterial, SceneBackend};

use super::scaled_count;
use crate::particles::ParticleSpawn;
use crate::system::WeatherSystem;

impl<S: SceneBackend> WeatherSystem<S> {
    /// Streaks blown along +X. Lighting is left as cleared.
    pub(crate) fn enable_windy(&mut self, f: f32) {
        let count = scaled_count(200.0, 800.0, f);
        let spawn = ParticleSpawn::wind(&mut self.rng, count, 0.1 + f * 0.3);
        self.spawn_particles(
            spawn,
            PointsMaterial::new(Rgb::from_hex(0xdddddd), 0.15, 0.2 + f * 0.3),
        );
        self.request_ambience(WeatherKind::Windy);
    }
}
