//! Cloud placement and drift.

use engine_core::{Transform, WeatherKind};
use glam::Vec3;
use rand::Rng;
use renderer::MeshHandle;

/// Clouds drifting past this X are moved back to the right edge.
pub const WRAP_X: f32 = -15.0;
const RESPAWN_X: f32 = 20.0;
const RESPAWN_X_JITTER: f32 = 5.0;
const Z_MIN: f32 = -7.5;
const Z_RANGE: f32 = 10.0;
const BOB_AMPLITUDE: f32 = 0.3;
const BOB_RATE: f32 = 0.3;
const DRIFT_FACTOR: f32 = 0.01;

/// How a weather kind fills the sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudStyle {
    pub count: usize,
    /// Full width of the X spawn range, centred on 0.
    pub x_spread: f32,
    pub y_base: f32,
    pub y_range: f32,
    pub scale: f32,
    /// Material colour multiplier.
    pub tint: f32,
    pub speed: f32,
    /// Multiply `speed` by a per-cloud factor in [0.5, 1.0).
    pub varied_speed: bool,
}

impl CloudStyle {
    /// Cloud layout for `kind` at intensity fraction `f`; `None` for clear skies.
    pub fn for_kind(kind: WeatherKind, f: f32) -> Option<Self> {
        let style = match kind {
            WeatherKind::Cloudy => CloudStyle {
                count: (5.0 + f * 15.0).floor() as usize,
                x_spread: 20.0,
                y_base: 2.0,
                y_range: 3.0,
                scale: 0.3 + f * 0.7,
                tint: 1.0,
                speed: 0.2 + f * 0.4,
                varied_speed: true,
            },
            WeatherKind::Rain => CloudStyle {
                count: (8.0 + f * 12.0).floor() as usize,
                x_spread: 25.0,
                y_base: 3.0,
                y_range: 2.0,
                scale: 0.6 + f * 0.5,
                tint: 0.5 + f * 0.2,
                speed: 0.15 + f * 0.25,
                varied_speed: false,
            },
            WeatherKind::Thunderstorm => CloudStyle {
                count: (12.0 + f * 15.0).floor() as usize,
                x_spread: 30.0,
                y_base: 3.5,
                y_range: 2.5,
                scale: 0.7 + f * 0.6,
                tint: 0.3 + f * 0.1,
                speed: 0.2 + f * 0.3,
                varied_speed: false,
            },
            _ => return None,
        };
        Some(style)
    }

    /// Random placement for one cloud of this style.
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R) -> CloudPlacement {
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * self.x_spread,
            self.y_base + rng.gen::<f32>() * self.y_range,
            Z_MIN + rng.gen::<f32>() * Z_RANGE,
        );
        let speed = if self.varied_speed {
            self.speed * (0.5 + rng.gen::<f32>() * 0.5)
        } else {
            self.speed
        };
        CloudPlacement {
            transform: Transform::from_position_scale(position, self.scale),
            speed,
            phase: rng.gen::<f32>() * std::f32::consts::TAU,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudPlacement {
    pub transform: Transform,
    pub speed: f32,
    pub phase: f32,
}

/// Outstanding cloud load, tagged with the weather generation that asked for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudRequest {
    pub generation: u64,
    pub style: CloudStyle,
}

/// A cloud in the scene.
#[derive(Debug, Clone)]
pub struct CloudInstance {
    pub handle: MeshHandle,
    pub transform: Transform,
    pub speed: f32,
    pub phase: f32,
    pub base_y: f32,
}

impl CloudInstance {
    pub fn new(handle: MeshHandle, placement: CloudPlacement) -> Self {
        Self {
            handle,
            base_y: placement.transform.position.y,
            transform: placement.transform,
            speed: placement.speed,
            phase: placement.phase,
        }
    }

    /// Drift left, bob around the base height, wrap at the left edge.
    pub fn drift<R: Rng + ?Sized>(&mut self, frame_scale: f32, time_secs: f32, rng: &mut R) {
        let position = &mut self.transform.position;
        position.x -= self.speed * DRIFT_FACTOR * frame_scale;
        position.y = self.base_y + (time_secs * BOB_RATE + self.phase).sin() * BOB_AMPLITUDE;
        if position.x < WRAP_X {
            position.x = RESPAWN_X + rng.gen::<f32>() * RESPAWN_X_JITTER;
            position.z = Z_MIN + rng.gen::<f32>() * Z_RANGE;
        }
    }
}
