use engine_core::WeatherKind;
use renderer::SceneBackend;

use super::RainStyle;
use crate::lightning::Lightning;
use crate::system::WeatherSystem;

impl<S: SceneBackend> WeatherSystem<S> {
    /// Dark storm clouds, heavy rain and the lightning rig.
    pub(crate) fn enable_thunderstorm(&mut self, f: f32) {
        self.request_clouds(WeatherKind::Thunderstorm, f);
        self.spawn_rain(RainStyle::storm(f));
        self.lightning = Some(Lightning::install(
            &mut self.scene,
            &mut self.rng,
            self.now_ms,
            self.intensity,
            self.settings.lightning,
        ));
        self.set_ambient_intensity(0.3 - f * 0.1);
        self.request_ambience(WeatherKind::Thunderstorm);
    }
}
