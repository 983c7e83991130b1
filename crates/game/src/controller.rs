//! Switching weather: the only way resources are created or released.

use engine_core::{Intensity, WeatherKind};
use renderer::SceneBackend;

use crate::system::WeatherSystem;

impl<S: SceneBackend> WeatherSystem<S> {
    /// Replace the current weather with `kind` at `intensity`.
    pub fn set_weather(&mut self, kind: WeatherKind, intensity: Intensity) {
        self.clear_all_weather();
        self.kind = Some(kind);
        self.intensity = intensity;
        log::info!("Weather: {} at intensity {} (generation {})", kind, intensity, self.generation);
        self.enable(kind);
    }

    /// `set_weather` by lowercase name. Unknown names change nothing and return false.
    pub fn set_weather_by_name(&mut self, name: &str, intensity: Intensity) -> bool {
        match name.parse::<WeatherKind>() {
            Ok(kind) => {
                self.set_weather(kind, intensity);
                true
            }
            Err(e) => {
                log::warn!("{}; weather unchanged", e);
                false
            }
        }
    }

    /// Rebuild the current weather at a new intensity. Does nothing before
    /// the first `set_weather`.
    pub fn set_intensity(&mut self, intensity: Intensity) {
        match self.kind {
            Some(kind) => self.set_weather(kind, intensity),
            None => log::debug!("Intensity {} ignored: no weather set", intensity),
        }
    }

    /// Release every weather resource and restore the default sky and light
    /// levels. Starts a new generation, so pending cloud loads and
    /// aftershocks from before are dropped when they arrive. Audio keeps playing.
    pub fn clear_all_weather(&mut self) {
        self.generation += 1;

        if let Some(field) = self.particles.take() {
            self.scene.remove_points(field.handle);
        }
        for cloud in self.clouds.drain(..) {
            self.scene.remove_instance(cloud.handle);
        }
        if let Some(lightning) = self.lightning.take() {
            lightning.dispose(&mut self.scene);
        }
        self.reset_atmosphere();
    }
}

#[cfg(test)]
mod tests {
    use crate::effects::{rain_count, FOG_COLOR};
    use crate::particles::ParticleMotion;
    use crate::system::test_support::*;
    use crate::system::ResourceCensus;
    use engine_core::{Intensity, Time, WeatherKind};
    use renderer::{HeadlessScene, Light, SceneBackend};
    use std::time::Duration;

    use super::*;

    fn run_frames(system: &mut WeatherSystem<HeadlessScene>, time: &mut Time, frames: usize) {
        for _ in 0..frames {
            time.advance(Duration::from_millis(16));
            system.tick(time).unwrap();
        }
    }

    fn points_len(system: &WeatherSystem<HeadlessScene>) -> usize {
        system
            .particles()
            .and_then(|p| system.scene().points(p.handle))
            .map_or(0, |b| b.len())
    }

    #[test]
    fn particle_counts_match_each_kind() {
        let cases = [
            (WeatherKind::Rain, 0, 500),
            (WeatherKind::Rain, 100, 2000),
            (WeatherKind::Thunderstorm, 0, 800),
            (WeatherKind::Thunderstorm, 100, 2500),
            (WeatherKind::Snow, 0, 300),
            (WeatherKind::Snow, 100, 1500),
            (WeatherKind::Fog, 0, 300),
            (WeatherKind::Fog, 100, 1000),
            (WeatherKind::Windy, 0, 200),
            (WeatherKind::Windy, 100, 1000),
            (WeatherKind::Clear, 50, 0),
            (WeatherKind::Cloudy, 50, 0),
        ];
        let (mut system, _) = system();
        for (kind, intensity, expected) in cases {
            system.set_weather(kind, Intensity::new(intensity));
            assert_eq!(points_len(&system), expected, "{kind} at {intensity}");
            assert_eq!(system.census().particles, expected);
            assert!(system.scene().stats().points <= 1);
        }
    }

    #[test]
    fn materials_follow_intensity() {
        let (mut system, _) = system();
        system.set_weather(WeatherKind::Fog, Intensity::new(100));
        let handle = system.particles().unwrap().handle;
        let material = system.scene().points(handle).unwrap().material;
        assert!(material.additive);
        assert_eq!(material.size, 5.0);
        assert!((material.opacity - 0.5).abs() < 1e-6);
        let fog = system.scene().fog().unwrap();
        assert_eq!((fog.near, fog.far), (1.0, 5.0));
        assert_eq!(system.scene().clear_color().to_hex(), FOG_COLOR);

        system.set_weather(WeatherKind::Snow, Intensity::new(0));
        let handle = system.particles().unwrap().handle;
        let material = system.scene().points(handle).unwrap().material;
        assert!(!material.additive);
        assert_eq!(material.size, 0.2);
        assert!((material.opacity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn particle_fields_scale_monotonically_across_intensity() {
        // (kind, count range, opacity range, size range, speed range)
        type Range = (f32, f32);
        let cases: [(WeatherKind, (usize, usize), Range, Range, Option<Range>); 5] = [
            (WeatherKind::Rain, (500, 2000), (0.4, 0.8), (0.1, 0.1), Some((0.1, 0.3))),
            (WeatherKind::Thunderstorm, (800, 2500), (0.5, 0.9), (0.12, 0.12), Some((0.15, 0.4))),
            (WeatherKind::Snow, (300, 1500), (0.6, 0.9), (0.2, 0.2), Some((0.02, 0.07))),
            (WeatherKind::Fog, (300, 1000), (0.2, 0.5), (2.0, 5.0), None),
            (WeatherKind::Windy, (200, 1000), (0.2, 0.5), (0.15, 0.15), Some((0.1, 0.4))),
        ];
        let within = |v: f32, (lo, hi): Range| v >= lo - 1e-5 && v <= hi + 1e-5;

        let (mut system, _) = system();
        for (kind, (min_count, max_count), opacity_range, size_range, speed_range) in cases {
            let mut previous: Option<(usize, f32, f32, Option<f32>)> = None;
            for i in 0..=100 {
                system.set_weather(kind, Intensity::new(i));
                let field = system.particles().unwrap();
                let material = system.scene().points(field.handle).unwrap().material;
                let count = points_len(&system);
                let speed = match &field.motion {
                    ParticleMotion::Fall { speeds, .. } => {
                        assert!(speeds.iter().all(|&s| s == speeds[0]), "{kind} at {i}");
                        speeds.first().copied()
                    }
                    ParticleMotion::Gust { speed } => Some(*speed),
                    ParticleMotion::Drift { .. } => None,
                };

                assert!((min_count..=max_count).contains(&count), "{kind} at {i}: {count}");
                assert!(within(material.opacity, opacity_range), "{kind} at {i}");
                assert!(within(material.size, size_range), "{kind} at {i}");
                assert_eq!(speed.is_some(), speed_range.is_some(), "{kind}");
                if let (Some(speed), Some(range)) = (speed, speed_range) {
                    assert!(within(speed, range), "{kind} at {i}: {speed}");
                }
                if i == 0 {
                    assert_eq!(count, min_count, "{kind}");
                }
                if i == 100 {
                    assert_eq!(count, max_count, "{kind}");
                }

                if let Some((count0, opacity0, size0, speed0)) = previous {
                    assert!(count >= count0, "{kind} count dropped at {i}");
                    assert!(material.opacity >= opacity0, "{kind} opacity dropped at {i}");
                    assert!(material.size >= size0, "{kind} size dropped at {i}");
                    if let (Some(s), Some(s0)) = (speed, speed0) {
                        assert!(s >= s0, "{kind} speed dropped at {i}");
                    }
                }
                previous = Some((count, material.opacity, material.size, speed));
            }
        }
    }

    #[test]
    fn ambient_light_per_kind() {
        let (mut system, _) = system();
        let ambient = system.lights().ambient;
        let level = |system: &WeatherSystem<HeadlessScene>| {
            system.scene().light(ambient).map(Light::intensity).unwrap()
        };

        system.set_weather(WeatherKind::Snow, Intensity::new(80));
        assert_eq!(level(&system), 0.7);
        system.set_weather(WeatherKind::Rain, Intensity::new(100));
        assert!((level(&system) - 0.3).abs() < 1e-6);
        system.set_weather(WeatherKind::Clear, Intensity::new(100));
        assert!((level(&system) - 0.8).abs() < 1e-6);
        assert_eq!(system.scene().background().to_hex(), 0x2a2a3e);
        // Windy leaves the cleared defaults alone.
        system.set_weather(WeatherKind::Windy, Intensity::new(100));
        assert_eq!(level(&system), 0.4);
        assert_eq!(system.scene().background().to_hex(), 0x1a1a2e);
    }

    #[test]
    fn switching_away_leaves_nothing_behind() {
        let (mut system, _) = system();
        let mut time = Time::new();
        let base_lights = system.scene().stats().lights;
        for kind in WeatherKind::ALL {
            system.set_weather(kind, Intensity::new(70));
            run_frames(&mut system, &mut time, 5);
            system.clear_all_weather();
            assert!(system.census().is_empty(), "{kind} left {:?}", system.census());
            let stats = system.scene().stats();
            assert_eq!(stats.points, 0, "{kind}");
            assert_eq!(stats.lines, 0, "{kind}");
            assert_eq!(stats.lights, base_lights, "{kind}");
            // Only the house may remain instanced.
            assert!(stats.instances <= 1, "{kind}");
            // House and cloud models stay resident, once each.
            assert!(stats.models <= 2, "{kind}");
        }
        assert_eq!(system.scene().stale_removals(), 0);
    }

    #[test]
    fn rain_to_snow_swaps_the_particle_field() {
        let (mut system, _) = system();
        system.set_weather(WeatherKind::Rain, Intensity::new(80));
        let rain = system.particles().unwrap().handle;
        let count = points_len(&system);
        assert!((1300..=2000).contains(&count));
        assert_eq!(count, rain_count(0.8));

        system.set_weather(WeatherKind::Snow, Intensity::new(10));
        assert!(system.scene().points(rain).is_none());
        let count = points_len(&system);
        assert!((300..=420).contains(&count));
        assert_eq!(system.scene().stats().points, 1);
        assert_eq!(system.census().particle_fields, 1);
    }

    #[test]
    fn clouds_are_rebuilt_on_every_change() {
        let (mut system, _) = system();
        let mut time = Time::new();
        system.set_weather(WeatherKind::Cloudy, Intensity::new(100));
        assert_eq!(system.census().pending_clouds, 20);
        run_frames(&mut system, &mut time, 2);
        assert_eq!(system.clouds().len(), 20);
        assert_eq!(system.census().pending_clouds, 0);

        system.set_weather(WeatherKind::Rain, Intensity::new(0));
        assert!(system.clouds().is_empty());
        assert_eq!(system.census().pending_clouds, 8);
        run_frames(&mut system, &mut time, 2);
        assert_eq!(system.clouds().len(), 8);
        let tint = system.scene().instance(system.clouds()[0].handle).unwrap().tint;
        assert!((tint - 0.5).abs() < 1e-6);
    }

    #[test]
    fn stale_cloud_loads_are_discarded() {
        let (mut system, _) = system();
        let mut time = Time::new();
        system.scene_mut().set_load_delay_frames(3);
        system.set_weather(WeatherKind::Thunderstorm, Intensity::new(50));
        run_frames(&mut system, &mut time, 1);
        system.set_weather(WeatherKind::Cloudy, Intensity::new(0));
        run_frames(&mut system, &mut time, 5);

        assert_eq!(system.clouds().len(), 5);
        assert_eq!(system.stats().stale_loads, 19);
        assert_eq!(system.scene().stats().instances, 5 + 1);
    }

    #[test]
    fn unknown_name_changes_nothing() {
        let (mut system, _) = system();
        system.set_weather(WeatherKind::Snow, Intensity::new(30));
        let generation = system.generation();
        let before = system.census();

        assert!(!system.set_weather_by_name("tornado", Intensity::new(90)));
        assert_eq!(system.kind(), Some(WeatherKind::Snow));
        assert_eq!(system.intensity().value(), 30);
        assert_eq!(system.generation(), generation);
        assert_eq!(system.census(), before);

        assert!(system.set_weather_by_name("fog", Intensity::new(90)));
        assert_eq!(system.kind(), Some(WeatherKind::Fog));
        assert_eq!(system.generation(), generation + 1);
    }

    #[test]
    fn set_intensity_rebuilds_current_kind() {
        let (mut system, _) = system();
        system.set_intensity(Intensity::new(90));
        assert_eq!(system.kind(), None);
        assert_eq!(system.generation(), 0);
        assert_eq!(system.census(), ResourceCensus::default());

        system.set_weather(WeatherKind::Windy, Intensity::new(0));
        system.set_intensity(Intensity::new(100));
        assert_eq!(system.kind(), Some(WeatherKind::Windy));
        assert_eq!(points_len(&system), 1000);
        assert_eq!(system.scene().stats().points, 1);
    }

    #[test]
    fn ambience_follows_weather_after_first_interaction() {
        let (mut system, recorder) = system();
        system.set_weather(WeatherKind::Rain, Intensity::new(0));
        system.set_weather(WeatherKind::Thunderstorm, Intensity::new(0));
        assert!(recorder.0.borrow().is_empty());

        system.notify_interaction();
        assert_eq!(
            recorder.0.borrow().last(),
            Some(&Played::Start(WeatherKind::Thunderstorm, 0.3, thunder_offset()))
        );

        // Clearing keeps the track; a silent kind stops it.
        system.clear_all_weather();
        assert_eq!(system.sound().current(), Some(WeatherKind::Thunderstorm));
        system.set_weather(WeatherKind::Cloudy, Intensity::new(50));
        assert_eq!(recorder.0.borrow().last(), Some(&Played::StopAll));
        assert_eq!(system.sound().current(), None);
    }

    #[test]
    fn clear_resets_sky_and_light_colours() {
        let (mut system, _) = system();
        system.set_weather(WeatherKind::Fog, Intensity::new(100));
        system.clear_all_weather();
        let scene = system.scene();
        assert_eq!(scene.background().to_hex(), 0x1a1a2e);
        assert_eq!(scene.clear_color().to_hex(), 0x1a1a2e);
        let fog = scene.fog().unwrap();
        assert_eq!((fog.near, fog.far), (10.0, 50.0));
        match scene.light(system.lights().ambient) {
            Some(Light::Ambient { color, intensity }) => {
                assert_eq!(color.to_hex(), 0x9999cc);
                assert_eq!(*intensity, 0.4);
            }
            other => panic!("expected ambient light, got {:?}", other),
        }
        match scene.light(system.lights().directional) {
            Some(Light::Directional { color, intensity, .. }) => {
                assert_eq!(color.to_hex(), 0xaaaadd);
                assert_eq!(*intensity, 0.3);
            }
            other => panic!("expected directional light, got {:?}", other),
        }
    }
}
