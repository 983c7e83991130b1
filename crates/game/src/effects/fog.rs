use engine_core::{Rgb, WeatherKind};
use renderer::{Fog, PointsMaterial, SceneBackend};

use super::scaled_count;
use crate::particles::ParticleSpawn;
use crate::system::WeatherSystem;

/// Sky, distance fog and clear colour while foggy.
pub const FOG_COLOR: u32 = 0x1a1a2e;
const BANK_COLOR: u32 = 0x4a5a4e;
const AMBIENT_TINT: u32 = 0x8a9a8e;
const DIRECTIONAL_TINT: u32 = 0x7a8a7e;

impl<S: SceneBackend> WeatherSystem<S> {
    /// Close, dense fog with slow additive banks and a greenish tint.
    pub(crate) fn enable_fog(&mut self, f: f32) {
        let fog_color = Rgb::from_hex(FOG_COLOR);
        self.scene.set_background(fog_color);
        self.scene.set_fog(Fog::new(fog_color, 1.0, 10.0 - f * 5.0));

        let spawn = ParticleSpawn::fog(&mut self.rng, scaled_count(300.0, 700.0, f));
        let material =
            PointsMaterial::new(Rgb::from_hex(BANK_COLOR), 2.0 + f * 3.0, 0.2 + f * 0.3).additive();
        self.spawn_particles(spawn, material);

        self.set_ambient(Rgb::from_hex(AMBIENT_TINT), 0.3 - f * 0.15);
        self.set_directional(Rgb::from_hex(DIRECTIONAL_TINT), 0.2);
        self.scene.set_clear_color(fog_color);
        self.request_ambience(WeatherKind::Fog);
    }
}
