//! Thunderstorm lightning: timed strikes, fading flashes, aftershocks and
//! short-lived bolt geometry.

use engine_core::{Intensity, Lifetime, Rgb};
use glam::Vec3;
use procgen::{generate_lightning_strike, LightningBolt};
use rand::Rng;
use renderer::{Light, LightHandle, LineHandle, LineMaterial, SceneBackend};
use serde::{Deserialize, Serialize};

pub const FLASH_COLOR: Rgb = Rgb::new(0.8, 0.933, 1.0);
pub const FLASH_DISTANCE: f32 = 80.0;
pub const FLASH_REST_POSITION: Vec3 = Vec3::new(0.0, 12.0, 0.0);
pub const SKY_COLOR: Rgb = Rgb::WHITE;
pub const GROUND_COLOR: Rgb = Rgb::new(0.267, 0.267, 0.4);
pub const BOLT_COLOR: Rgb = Rgb::new(0.933, 1.0, 1.0);
const BOLT_WIDTH: f32 = 2.0;

/// Delay before the first strike after a storm starts, ms.
const FIRST_STRIKE_MIN_MS: f64 = 1000.0;
const FIRST_STRIKE_RANGE_MS: f64 = 2000.0;
const FLASH_MIN_MS: f64 = 100.0;
const FLASH_RANGE_MS: f64 = 150.0;
const AFTERSHOCK_DELAY_MIN_MS: f64 = 50.0;
const AFTERSHOCK_DELAY_RANGE_MS: f64 = 100.0;
const AFTERSHOCK_HOLD_MIN_MS: f64 = 30.0;
const AFTERSHOCK_HOLD_RANGE_MS: f64 = 50.0;
pub const AFTERSHOCK_FLASH_SCALE: f32 = 0.4;
pub const AFTERSHOCK_AMBIENT_SCALE: f32 = 0.3;

/// Strike cadence knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightningTuning {
    /// Multiplier on the strike intervals; 0.25 strikes four times as often.
    #[serde(default = "default_frequency_boost")]
    pub frequency_boost: f64,
    /// Probability of a secondary flash after each strike fades.
    #[serde(default = "default_aftershock_chance")]
    pub aftershock_chance: f64,
}

fn default_frequency_boost() -> f64 {
    0.25
}
fn default_aftershock_chance() -> f64 {
    0.3
}

impl Default for LightningTuning {
    fn default() -> Self {
        Self {
            frequency_boost: default_frequency_boost(),
            aftershock_chance: default_aftershock_chance(),
        }
    }
}

/// `[min, max)` delay in ms between strikes at `intensity`.
pub fn strike_interval_bounds(intensity: Intensity, frequency_boost: f64) -> (f64, f64) {
    let f = intensity.fraction() as f64;
    (
        (800.0 - f * 400.0) * frequency_boost,
        (4000.0 - f * 2000.0) * frequency_boost,
    )
}

/// Bolt opacity at `age` into a `lifetime`; 1 at birth, 0 at the end.
pub fn bolt_opacity(age_ms: f64, lifetime_ms: f64) -> f32 {
    if lifetime_ms <= 0.0 {
        return 0.0;
    }
    (1.0 - (age_ms / lifetime_ms).clamp(0.0, 1.0).powf(0.3)) as f32
}

/// Flash brightness multiplier at `progress` through the fade.
pub fn flash_fade(progress: f64) -> f32 {
    (1.0 - progress.clamp(0.0, 1.0).sqrt()) as f32
}

/// Flash state of the storm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlashState {
    Idle,
    Flashing {
        fade_start_ms: f64,
        duration_ms: f64,
        flash_intensity: f32,
        ambient_intensity: f32,
    },
}

/// The two lights a storm flashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThunderRig {
    /// Point light moved to each strike.
    pub flash: LightHandle,
    /// Sky-wide hemisphere light.
    pub ambient: LightHandle,
}

impl ThunderRig {
    fn install<S: SceneBackend>(scene: &mut S) -> Self {
        let flash = scene.add_light(Light::Point {
            color: FLASH_COLOR,
            intensity: 0.0,
            distance: FLASH_DISTANCE,
            position: FLASH_REST_POSITION,
        });
        let ambient = scene.add_light(Light::Hemisphere {
            sky: SKY_COLOR,
            ground: GROUND_COLOR,
            intensity: 0.0,
        });
        Self { flash, ambient }
    }

    pub fn set<S: SceneBackend>(&self, scene: &mut S, flash: f32, ambient: f32) {
        scene.set_light_intensity(self.flash, flash);
        scene.set_light_intensity(self.ambient, ambient);
    }
}

/// A bolt drawn in the scene.
#[derive(Debug, Clone, Copy)]
pub struct LiveBolt {
    pub handle: LineHandle,
    pub life: Lifetime,
}

/// Secondary flash to fire later at a fraction of the strike's brightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aftershock {
    pub due_ms: f64,
    pub flash_intensity: f32,
    pub ambient_intensity: f32,
}

impl Aftershock {
    /// How long the secondary flash stays lit.
    pub fn hold_ms<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        AFTERSHOCK_HOLD_MIN_MS + rng.gen::<f64>() * AFTERSHOCK_HOLD_RANGE_MS
    }
}

/// Lightning for the active thunderstorm.
#[derive(Debug)]
pub struct Lightning {
    pub rig: ThunderRig,
    pub state: FlashState,
    pub next_strike_ms: f64,
    pub bolts: Vec<LiveBolt>,
    intensity: Intensity,
    tuning: LightningTuning,
    strikes: u64,
}

impl Lightning {
    /// Add the rig lights and schedule the first strike.
    pub fn install<S: SceneBackend, R: Rng + ?Sized>(
        scene: &mut S,
        rng: &mut R,
        now_ms: f64,
        intensity: Intensity,
        tuning: LightningTuning,
    ) -> Self {
        Self {
            rig: ThunderRig::install(scene),
            state: FlashState::Idle,
            next_strike_ms: now_ms + FIRST_STRIKE_MIN_MS + rng.gen::<f64>() * FIRST_STRIKE_RANGE_MS,
            bolts: Vec::new(),
            intensity,
            tuning,
            strikes: 0,
        }
    }

    pub fn strikes(&self) -> u64 {
        self.strikes
    }

    /// One frame: strike if due, fade the flash, age bolts.
    /// Returns an aftershock to schedule when a flash has just ended.
    pub fn tick<S: SceneBackend, R: Rng + ?Sized>(
        &mut self,
        scene: &mut S,
        rng: &mut R,
        now_ms: f64,
    ) -> Option<Aftershock> {
        if now_ms >= self.next_strike_ms {
            self.strike(scene, rng, now_ms);
        }
        let aftershock = self.fade(scene, rng, now_ms);
        self.age_bolts(scene, now_ms);
        aftershock
    }

    fn strike<S: SceneBackend, R: Rng + ?Sized>(&mut self, scene: &mut S, rng: &mut R, now_ms: f64) {
        let f = self.intensity.fraction();
        let strike = generate_lightning_strike(rng, self.intensity.value() as f32);
        for bolt in strike.bolts() {
            self.bolts.push(add_bolt(scene, bolt, now_ms));
        }

        scene.set_light_position(self.rig.flash, strike.origin);
        scene.set_light_position(self.rig.ambient, strike.ground);
        let flash_intensity = 3.0 + f * 7.0;
        let ambient_intensity = 0.5 + f * 1.5;
        self.rig.set(scene, flash_intensity, ambient_intensity);
        self.state = FlashState::Flashing {
            fade_start_ms: now_ms,
            duration_ms: FLASH_MIN_MS + rng.gen::<f64>() * FLASH_RANGE_MS,
            flash_intensity,
            ambient_intensity,
        };

        let (min, max) = strike_interval_bounds(self.intensity, self.tuning.frequency_boost);
        self.next_strike_ms = now_ms + min + rng.gen::<f64>() * (max - min);
        self.strikes += 1;
        log::debug!(
            "Lightning strike #{} at {}, next in {:.0} ms",
            self.strikes,
            strike.origin,
            self.next_strike_ms - now_ms
        );
    }

    fn fade<S: SceneBackend, R: Rng + ?Sized>(
        &mut self,
        scene: &mut S,
        rng: &mut R,
        now_ms: f64,
    ) -> Option<Aftershock> {
        let FlashState::Flashing {
            fade_start_ms,
            duration_ms,
            flash_intensity,
            ambient_intensity,
        } = self.state
        else {
            return None;
        };

        let progress = (now_ms - fade_start_ms) / duration_ms;
        if progress < 1.0 {
            let fade = flash_fade(progress);
            self.rig.set(scene, flash_intensity * fade, ambient_intensity * fade);
            return None;
        }

        self.rig.set(scene, 0.0, 0.0);
        self.state = FlashState::Idle;
        if rng.gen::<f64>() < self.tuning.aftershock_chance {
            Some(Aftershock {
                due_ms: now_ms
                    + AFTERSHOCK_DELAY_MIN_MS
                    + rng.gen::<f64>() * AFTERSHOCK_DELAY_RANGE_MS,
                flash_intensity,
                ambient_intensity,
            })
        } else {
            None
        }
    }

    fn age_bolts<S: SceneBackend>(&mut self, scene: &mut S, now_ms: f64) {
        self.bolts.retain(|bolt| {
            if bolt.life.is_expired(now_ms) {
                scene.remove_line(bolt.handle);
                false
            } else {
                let opacity = bolt_opacity(bolt.life.age(now_ms), bolt.life.duration_ms);
                scene.set_line_opacity(bolt.handle, opacity);
                true
            }
        });
    }

    /// Light the rig at the aftershock's reduced brightness.
    pub fn flash_aftershock<S: SceneBackend>(&self, scene: &mut S, aftershock: &Aftershock) {
        self.rig.set(
            scene,
            aftershock.flash_intensity * AFTERSHOCK_FLASH_SCALE,
            aftershock.ambient_intensity * AFTERSHOCK_AMBIENT_SCALE,
        );
    }

    pub fn darken<S: SceneBackend>(&self, scene: &mut S) {
        self.rig.set(scene, 0.0, 0.0);
    }

    /// Remove the rig and every bolt from the scene.
    pub fn dispose<S: SceneBackend>(self, scene: &mut S) {
        for bolt in self.bolts {
            scene.remove_line(bolt.handle);
        }
        scene.remove_light(self.rig.flash);
        scene.remove_light(self.rig.ambient);
    }
}

fn add_bolt<S: SceneBackend>(scene: &mut S, bolt: &LightningBolt, now_ms: f64) -> LiveBolt {
    let handle = scene.add_line(
        &bolt.points,
        LineMaterial {
            color: BOLT_COLOR,
            opacity: 1.0,
            width: BOLT_WIDTH,
        },
    );
    LiveBolt {
        handle,
        life: Lifetime::new(now_ms, bolt.lifetime_ms as f64),
    }
}
