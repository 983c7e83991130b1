use engine_core::WeatherKind;
use renderer::SceneBackend;

use crate::system::WeatherSystem;

impl<S: SceneBackend> WeatherSystem<S> {
    pub(crate) fn enable_cloudy(&mut self, f: f32) {
        self.request_ambience(WeatherKind::Cloudy);
        self.request_clouds(WeatherKind::Cloudy, f);
        self.set_ambient_intensity(0.6 - f * 0.2);
    }
}
