//! Per-frame update of the weather scene.

use engine_core::{Time, WeatherKind};
use renderer::{LoadedModel, RenderError, SceneBackend};

use crate::clouds::CloudInstance;
use crate::lightning::Aftershock;
use crate::system::{house_placement, Deferred, DeferredEvent, House, WeatherSystem};

const HOUSE_BOB_AMPLITUDE: f32 = 0.2;
const HOUSE_BOB_RATE: f32 = 0.5;

impl<S: SceneBackend> WeatherSystem<S> {
    /// Advance every live effect by one frame and render.
    pub fn tick(&mut self, time: &Time) -> Result<(), RenderError> {
        self.now_ms = time.now_ms();
        let t = time.elapsed_seconds();
        let frame_scale = time.frame_scale();

        for loaded in self.scene.poll_loaded() {
            self.on_model_loaded(loaded);
        }
        for deferred in self.timers.drain_due(self.now_ms) {
            self.on_deferred(deferred);
        }

        if let House::Floating {
            handle,
            mut transform,
            center_y,
        } = self.house
        {
            transform.position.y = center_y + (t * HOUSE_BOB_RATE).sin() * HOUSE_BOB_AMPLITUDE;
            self.scene.set_instance_transform(handle, &transform);
            self.house = House::Floating {
                handle,
                transform,
                center_y,
            };
        }

        for cloud in &mut self.clouds {
            cloud.drift(frame_scale, t, &mut self.rng);
            self.scene.set_instance_transform(cloud.handle, &cloud.transform);
        }

        if let Some(field) = &mut self.particles {
            field.tick(frame_scale, t, &mut self.rng);
            self.scene.update_points(field.handle, &field.positions);
        }

        if self.kind == Some(WeatherKind::Thunderstorm) {
            if let Some(lightning) = &mut self.lightning {
                let before = lightning.strikes();
                let aftershock = lightning.tick(&mut self.scene, &mut self.rng, self.now_ms);
                self.stats.strikes += lightning.strikes() - before;
                if let Some(aftershock) = aftershock {
                    self.timers.schedule(
                        aftershock.due_ms,
                        Deferred {
                            generation: self.generation,
                            event: DeferredEvent::AftershockFlash(aftershock),
                        },
                    );
                }
            }
        }

        self.scene.render()
    }

    fn on_model_loaded(&mut self, loaded: LoadedModel) {
        if let House::Loading(ticket) = self.house {
            if ticket == loaded.ticket {
                self.place_house(loaded);
                return;
            }
        }

        let Some(request) = self.cloud_requests.remove(&loaded.ticket) else {
            log::debug!("Ignoring completed load {:?} nobody asked for", loaded.ticket);
            return;
        };
        if request.generation != self.generation {
            self.stats.stale_loads += 1;
            log::debug!(
                "Discarding cloud from generation {} (now {})",
                request.generation,
                self.generation
            );
            return;
        }

        let info = match loaded.result {
            Ok(info) => info,
            Err(e) => {
                log::warn!("Cloud model unavailable: {}", e);
                return;
            }
        };
        let placement = request.style.place(&mut self.rng);
        match self
            .scene
            .add_instance(info.id, &placement.transform, request.style.tint)
        {
            Ok(handle) => self.clouds.push(CloudInstance::new(handle, placement)),
            Err(e) => log::warn!("Could not add cloud: {}", e),
        }
    }

    fn place_house(&mut self, loaded: LoadedModel) {
        let info = match loaded.result {
            Ok(info) => info,
            Err(e) => {
                log::warn!("House model unavailable: {}", e);
                self.house = House::Missing;
                return;
            }
        };
        let (transform, center_y) = house_placement(&info.bounds);
        self.house = match self.scene.add_instance(info.id, &transform, 1.0) {
            Ok(handle) => {
                log::info!("House placed, scale {:.3}", transform.scale.x);
                House::Floating {
                    handle,
                    transform,
                    center_y,
                }
            }
            Err(e) => {
                log::warn!("Could not add house: {}", e);
                House::Missing
            }
        };
    }

    fn on_deferred(&mut self, deferred: Deferred) {
        let live = deferred.generation == self.generation;
        let Some(lightning) = self.lightning.as_ref().filter(|_| live) else {
            self.stats.stale_timers += 1;
            log::debug!(
                "Dropping {:?} from generation {} (now {})",
                deferred.event,
                deferred.generation,
                self.generation
            );
            return;
        };

        match deferred.event {
            DeferredEvent::AftershockFlash(aftershock) => {
                lightning.flash_aftershock(&mut self.scene, &aftershock);
                self.stats.aftershocks += 1;
                let hold = Aftershock::hold_ms(&mut self.rng);
                self.timers.schedule(
                    self.now_ms + hold,
                    Deferred {
                        generation: self.generation,
                        event: DeferredEvent::AftershockEnd,
                    },
                );
            }
            DeferredEvent::AftershockEnd => lightning.darken(&mut self.scene),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lightning::{FlashState, LightningTuning};
    use crate::system::test_support::*;
    use crate::system::SystemSettings;
    use engine_core::{Intensity, Time, WeatherKind};
    use renderer::{HeadlessScene, Light};
    use std::time::Duration;

    use super::*;

    fn step(system: &mut WeatherSystem<HeadlessScene>, time: &mut Time, ms: u64) {
        time.advance(Duration::from_millis(ms));
        system.tick(time).unwrap();
    }

    fn flash_level(system: &WeatherSystem<HeadlessScene>) -> f32 {
        let rig = system.lightning().unwrap().rig;
        system.scene().light(rig.flash).map(Light::intensity).unwrap()
    }

    #[test]
    fn house_floats_around_its_centre() {
        let (mut system, _) = system();
        let mut time = Time::new();
        step(&mut system, &mut time, 16);
        let House::Floating { handle, center_y, .. } = system.house() else {
            panic!("house should be placed after one frame");
        };
        assert_eq!(center_y, -5.5);

        for _ in 0..200 {
            step(&mut system, &mut time, 16);
            let House::Floating { transform, .. } = system.house() else {
                panic!("house disappeared");
            };
            assert!((transform.position.y - center_y).abs() <= 0.2 + 1e-5);
            let expected = center_y + (time.elapsed_seconds() * 0.5).sin() * 0.2;
            assert!((transform.position.y - expected).abs() < 1e-5);
        }
        let raw = system.scene().instance(handle).unwrap().transform;
        assert!((raw.model[3][1] - (center_y + (time.elapsed_seconds() * 0.5).sin() * 0.2)).abs() < 1e-4);
    }

    #[test]
    fn missing_house_model_is_reported_not_fatal() {
        let settings = SystemSettings {
            house_model: "models/nowhere.glb".into(),
            ..SystemSettings::default()
        };
        let (mut system, _) = system_with(settings);
        let mut time = Time::new();
        step(&mut system, &mut time, 16);
        assert!(matches!(system.house(), House::Missing));
        assert_eq!(system.scene().frames_rendered(), 1);
    }

    #[test]
    fn particle_buffers_are_uploaded_every_frame() {
        let (mut system, _) = system();
        let mut time = Time::new();
        system.set_weather(WeatherKind::Rain, Intensity::new(50));
        let handle = system.particles().unwrap().handle;
        let before = system.scene().points(handle).unwrap().position(0).unwrap();
        for _ in 0..10 {
            step(&mut system, &mut time, 16);
        }
        let buffer = system.scene().points(handle).unwrap();
        assert_eq!(buffer.uploads, 11);
        assert_ne!(buffer.position(0).unwrap(), before);
        assert_eq!(buffer.position(0), system.particles().map(|p| p.positions[0]));
    }

    #[test]
    fn thunderstorm_end_to_end() {
        let settings = SystemSettings {
            lightning: LightningTuning {
                frequency_boost: 10.0,
                aftershock_chance: 0.0,
            },
            ..SystemSettings::default()
        };
        let (mut system, _) = system_with(settings);
        let mut time = Time::new();
        system.set_weather(WeatherKind::Thunderstorm, Intensity::new(80));
        assert_eq!(system.census().rig_lights, 2);
        assert_eq!(system.scene().stats().lights, 5);
        assert_eq!(flash_level(&system), 0.0);

        let mut peak_bolts = 0;
        let mut peak = 0.0_f32;
        for _ in 0..220 {
            step(&mut system, &mut time, 16);
            peak_bolts = peak_bolts.max(system.census().bolts);
            peak = peak.max(flash_level(&system));
        }
        // 3.52 s: exactly one strike (first at 1-3 s, the next at least 4.8 s later).
        assert_eq!(system.stats().strikes, 1);
        // One main bolt plus the branches for intensity 80, all drawn on the strike frame.
        assert_eq!(procgen::branch_count(80.0), 3);
        assert_eq!(peak_bolts, 1 + procgen::branch_count(80.0));
        assert!(peak > 0.0 && peak <= 8.6 + 1e-4);
        assert_eq!(flash_level(&system), 0.0);
        assert_eq!(system.lightning().unwrap().state, FlashState::Idle);
        assert_eq!(system.census().bolts, 0);
        assert_eq!(system.scene().stats().lines, 0);

        system.set_weather(WeatherKind::Clear, Intensity::new(50));
        assert!(system.census().is_empty());
        assert_eq!(system.scene().stats().lights, 3);
        step(&mut system, &mut time, 16);
        assert_eq!(system.stats().strikes, 1);
    }

    #[test]
    fn aftershocks_fire_and_go_stale_after_a_switch() {
        let settings = SystemSettings {
            lightning: LightningTuning {
                frequency_boost: 10.0,
                aftershock_chance: 1.0,
            },
            ..SystemSettings::default()
        };
        let (mut system, _) = system_with(settings);
        let mut time = Time::new();
        system.set_weather(WeatherKind::Thunderstorm, Intensity::new(100));

        // Run until the first flash has faded and queued its aftershock.
        let mut frames = 0;
        while system.census().live_timers == 0 {
            step(&mut system, &mut time, 10);
            frames += 1;
            assert!(frames < 400, "no aftershock was scheduled");
        }
        assert_eq!(flash_level(&system), 0.0);

        // Secondary flash at 40% of the strike, then dark again.
        let mut lit = 0.0_f32;
        for _ in 0..30 {
            step(&mut system, &mut time, 10);
            lit = lit.max(flash_level(&system));
        }
        assert_eq!(system.stats().aftershocks, 1);
        assert!((lit - 4.0).abs() < 1e-4);
        assert_eq!(flash_level(&system), 0.0);

        // A second storm's aftershock is dropped once the weather changes.
        let t = system.lightning().unwrap().next_strike_ms;
        while time.now_ms() < t {
            step(&mut system, &mut time, 10);
        }
        while system.census().live_timers == 0 {
            step(&mut system, &mut time, 10);
        }
        system.set_weather(WeatherKind::Rain, Intensity::new(10));
        assert_eq!(system.census().live_timers, 0);
        for _ in 0..30 {
            step(&mut system, &mut time, 10);
        }
        assert_eq!(system.stats().aftershocks, 1);
        assert_eq!(system.stats().stale_timers, 1);
        assert!(system.lightning().is_none());
    }
}
