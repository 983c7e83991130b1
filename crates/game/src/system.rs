//! `WeatherSystem`: owner of every scene resource the weather effects create.

use std::collections::HashMap;

use audio::SoundDirector;
use engine_core::{Intensity, Rgb, TimerQueue, Transform, WeatherKind};
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use renderer::{Bounds, Fog, Light, LightHandle, LoadTicket, MeshHandle, SceneBackend};

use crate::clouds::{CloudInstance, CloudRequest};
use crate::config::AppConfig;
use crate::lightning::{Aftershock, Lightning, LightningTuning};
use crate::particles::ParticleField;

pub const DEFAULT_BACKGROUND: u32 = 0x1a1a2e;
pub const DEFAULT_FOG_NEAR: f32 = 10.0;
pub const DEFAULT_FOG_FAR: f32 = 50.0;
pub const AMBIENT_COLOR: u32 = 0x9999cc;
pub const AMBIENT_INTENSITY: f32 = 0.4;
pub const DIRECTIONAL_COLOR: u32 = 0xaaaadd;
pub const DIRECTIONAL_INTENSITY: f32 = 0.3;
const DIRECTIONAL_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);
const RIM_COLOR: u32 = 0x6666aa;
const RIM_INTENSITY: f32 = 0.2;
const RIM_POSITION: Vec3 = Vec3::new(-5.0, 3.0, -5.0);

/// Largest house dimension after scaling.
const HOUSE_SIZE: f32 = 6.0;
/// How far below the origin the house floats.
const HOUSE_DROP: f32 = 2.5;
const HOUSE_TILT: f32 = -0.15 * std::f32::consts::PI;
const HOUSE_TURN: f32 = 0.5 * std::f32::consts::PI;

/// Models the system loads and how lightning behaves.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSettings {
    pub house_model: String,
    pub cloud_model: String,
    pub lightning: LightningTuning,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SystemSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            house_model: config.house_model.clone(),
            cloud_model: config.cloud_model.clone(),
            lightning: config.lightning,
        }
    }
}

/// Lights that live for the whole session; effects only recolour and dim them.
#[derive(Debug, Clone, Copy)]
pub struct BaseLights {
    pub ambient: LightHandle,
    pub directional: LightHandle,
    pub rim: LightHandle,
}

/// The floating house.
#[derive(Debug, Clone, Copy)]
pub enum House {
    Loading(LoadTicket),
    Floating {
        handle: MeshHandle,
        transform: Transform,
        center_y: f32,
    },
    Missing,
}

/// Centre the model, tilt and turn it, and scale its largest side to `HOUSE_SIZE`.
/// Returns the transform and the height the house floats around.
pub fn house_placement(bounds: &Bounds) -> (Transform, f32) {
    let center = bounds.center();
    let max_dim = bounds.size().max_element();
    let scale = if max_dim > 0.0 { HOUSE_SIZE / max_dim } else { 1.0 };
    let center_y = -center.y - HOUSE_DROP;
    let transform = Transform {
        position: Vec3::new(-center.x, center_y, -center.z),
        rotation: Quat::from_rotation_x(HOUSE_TILT) * Quat::from_rotation_y(HOUSE_TURN),
        scale: Vec3::splat(scale),
    };
    (transform, center_y)
}

/// Deferred work, tagged with the generation that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deferred {
    pub generation: u64,
    pub event: DeferredEvent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredEvent {
    AftershockFlash(Aftershock),
    AftershockEnd,
}

/// Counters for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemStats {
    pub strikes: u64,
    pub aftershocks: u64,
    /// Model loads that completed after their weather was replaced.
    pub stale_loads: u64,
    /// Timers that fired after their weather was replaced.
    pub stale_timers: u64,
}

/// Weather resources currently held. All zero means nothing leaked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceCensus {
    pub particle_fields: usize,
    pub particles: usize,
    pub clouds: usize,
    pub pending_clouds: usize,
    pub rig_lights: usize,
    pub bolts: usize,
    pub live_timers: usize,
}

impl ResourceCensus {
    pub fn is_empty(&self) -> bool {
        *self == ResourceCensus::default()
    }
}

/// Weather effects for one scene.
pub struct WeatherSystem<S: SceneBackend> {
    pub(crate) scene: S,
    pub(crate) sound: SoundDirector,
    pub(crate) rng: StdRng,
    pub(crate) settings: SystemSettings,
    pub(crate) generation: u64,
    pub(crate) kind: Option<WeatherKind>,
    pub(crate) intensity: Intensity,
    /// Timeline position of the last tick, ms.
    pub(crate) now_ms: f64,
    pub(crate) lights: BaseLights,
    pub(crate) house: House,
    pub(crate) particles: Option<ParticleField>,
    pub(crate) clouds: Vec<CloudInstance>,
    pub(crate) cloud_requests: HashMap<LoadTicket, CloudRequest>,
    pub(crate) lightning: Option<Lightning>,
    pub(crate) timers: TimerQueue<Deferred>,
    pub(crate) stats: SystemStats,
}

impl<S: SceneBackend> WeatherSystem<S> {
    /// Set up base lighting and the default sky, and start loading the house.
    pub fn new(mut scene: S, sound: SoundDirector, settings: SystemSettings, rng: StdRng) -> Self {
        let lights = BaseLights {
            ambient: scene.add_light(Light::Ambient {
                color: Rgb::from_hex(AMBIENT_COLOR),
                intensity: AMBIENT_INTENSITY,
            }),
            directional: scene.add_light(Light::Directional {
                color: Rgb::from_hex(DIRECTIONAL_COLOR),
                intensity: DIRECTIONAL_INTENSITY,
                position: DIRECTIONAL_POSITION,
            }),
            rim: scene.add_light(Light::Directional {
                color: Rgb::from_hex(RIM_COLOR),
                intensity: RIM_INTENSITY,
                position: RIM_POSITION,
            }),
        };
        let house = House::Loading(scene.request_model(&settings.house_model));

        let mut system = Self {
            scene,
            sound,
            rng,
            settings,
            generation: 0,
            kind: None,
            intensity: Intensity::default(),
            now_ms: 0.0,
            lights,
            house,
            particles: None,
            clouds: Vec::new(),
            cloud_requests: HashMap::new(),
            lightning: None,
            timers: TimerQueue::new(),
            stats: SystemStats::default(),
        };
        system.reset_atmosphere();
        system
    }

    /// Default sky and base light levels.
    pub(crate) fn reset_atmosphere(&mut self) {
        let background = Rgb::from_hex(DEFAULT_BACKGROUND);
        self.scene.set_background(background);
        self.scene
            .set_fog(Fog::new(background, DEFAULT_FOG_NEAR, DEFAULT_FOG_FAR));
        self.scene.set_clear_color(background);
        self.set_ambient(Rgb::from_hex(AMBIENT_COLOR), AMBIENT_INTENSITY);
        self.set_directional(Rgb::from_hex(DIRECTIONAL_COLOR), DIRECTIONAL_INTENSITY);
    }

    pub(crate) fn set_ambient(&mut self, color: Rgb, intensity: f32) {
        self.scene.set_light_color(self.lights.ambient, color);
        self.scene.set_light_intensity(self.lights.ambient, intensity);
    }

    pub(crate) fn set_ambient_intensity(&mut self, intensity: f32) {
        self.scene.set_light_intensity(self.lights.ambient, intensity);
    }

    pub(crate) fn set_directional(&mut self, color: Rgb, intensity: f32) {
        self.scene.set_light_color(self.lights.directional, color);
        self.scene.set_light_intensity(self.lights.directional, intensity);
    }

    /// Treat the next call as a user gesture, releasing queued audio.
    pub fn notify_interaction(&mut self) {
        self.sound.notify_interaction();
    }

    pub fn census(&self) -> ResourceCensus {
        ResourceCensus {
            particle_fields: usize::from(self.particles.is_some()),
            particles: self.particles.as_ref().map_or(0, ParticleField::len),
            clouds: self.clouds.len(),
            pending_clouds: self
                .cloud_requests
                .values()
                .filter(|r| r.generation == self.generation)
                .count(),
            rig_lights: if self.lightning.is_some() { 2 } else { 0 },
            bolts: self.lightning.as_ref().map_or(0, |l| l.bolts.len()),
            live_timers: self
                .timers
                .pending()
                .filter(|d| d.generation == self.generation)
                .count(),
        }
    }

    pub fn kind(&self) -> Option<WeatherKind> {
        self.kind
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> SystemStats {
        self.stats
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn sound(&self) -> &SoundDirector {
        &self.sound
    }

    pub fn lights(&self) -> BaseLights {
        self.lights
    }

    pub fn house(&self) -> House {
        self.house
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.particles.as_ref()
    }

    pub fn clouds(&self) -> &[CloudInstance] {
        &self.clouds
    }

    pub fn lightning(&self) -> Option<&Lightning> {
        self.lightning.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use audio::{SoundOutput, THUNDERSTORM_START_OFFSET_SECS};
    use rand::SeedableRng;
    use renderer::HeadlessScene;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub const HOUSE: &str = "models/forest_house.glb";
    pub const CLOUD: &str = "models/cloud_test.glb";

    #[derive(Debug, Clone, PartialEq)]
    pub enum Played {
        Start(WeatherKind, f64, f64),
        Volume(f64),
        StopAll,
    }

    /// Sound output that records what it was asked to do.
    #[derive(Clone, Default)]
    pub struct Recorder(pub Rc<RefCell<Vec<Played>>>);

    impl SoundOutput for Recorder {
        fn start(&mut self, kind: WeatherKind, volume: f64, offset: f64) -> anyhow::Result<()> {
            self.0.borrow_mut().push(Played::Start(kind, volume, offset));
            Ok(())
        }

        fn set_volume(&mut self, volume: f64) {
            self.0.borrow_mut().push(Played::Volume(volume));
        }

        fn stop_all(&mut self) {
            self.0.borrow_mut().push(Played::StopAll);
        }
    }

    pub fn scene_with_models() -> HeadlessScene {
        let mut scene = HeadlessScene::new();
        scene.register_model(HOUSE, Bounds::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(3.0, 6.0, 10.0)));
        scene.register_model(CLOUD, Bounds::new(Vec3::splat(-1.0), Vec3::splat(1.0)));
        scene
    }

    pub fn system_with(settings: SystemSettings) -> (WeatherSystem<HeadlessScene>, Recorder) {
        let recorder = Recorder::default();
        let director = SoundDirector::new(Box::new(recorder.clone()));
        let system = WeatherSystem::new(
            scene_with_models(),
            director,
            settings,
            StdRng::seed_from_u64(2024),
        );
        (system, recorder)
    }

    pub fn system() -> (WeatherSystem<HeadlessScene>, Recorder) {
        system_with(SystemSettings::default())
    }

    pub fn thunder_offset() -> f64 {
        THUNDERSTORM_START_OFFSET_SECS
    }
}
