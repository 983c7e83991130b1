use engine_core::{Rgb, WeatherKind};
use renderer::{Fog, SceneBackend};

use crate::system::{WeatherSystem, AMBIENT_COLOR, DIRECTIONAL_COLOR};

const CLEAR_SKY: u32 = 0x2a2a3e;

impl<S: SceneBackend> WeatherSystem<S> {
    /// Slightly lighter night sky with thinner fog; no particles or clouds.
    pub(crate) fn enable_clear(&mut self, f: f32) {
        self.request_ambience(WeatherKind::Clear);

        let sky = Rgb::from_hex(CLEAR_SKY);
        self.scene.set_background(sky);
        self.scene.set_fog(Fog::new(sky, 15.0, 60.0));
        self.set_ambient(Rgb::from_hex(AMBIENT_COLOR), 0.5 + f * 0.3);
        self.set_directional(Rgb::from_hex(DIRECTIONAL_COLOR), 0.4 + f * 0.3);
    }
}
