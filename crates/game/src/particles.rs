//! Particle fields for rain, snow, fog and wind.
//!
//! A field owns its positions and the per-kind velocity data, and is mutated
//! in place once per frame by `tick`. Speeds are expressed per 60 Hz frame and
//! scaled by the frame's `frame_scale`.

use glam::Vec3;
use procgen::{generate_scattered_points, ScatterVolume};
use rand::Rng;
use renderer::PointsHandle;

/// Rain and snow: 30 x 20 x 30 box above the ground.
pub const PRECIPITATION_VOLUME: ScatterVolume = ScatterVolume::new(15.0, 0.0, 20.0, 15.0);
/// Fog banks: 40 x 15 x 40 box, wrapped on every axis.
pub const FOG_VOLUME: ScatterVolume = ScatterVolume::new(20.0, 0.0, 15.0, 20.0);
/// Wind streaks: 30 x 15 x 30 box, wrapped along X.
pub const WIND_VOLUME: ScatterVolume = ScatterVolume::new(15.0, 0.0, 15.0, 15.0);

/// Precipitation below this height is recycled to `RESPAWN_HEIGHT`.
pub const FLOOR_HEIGHT: f32 = -5.0;
pub const RESPAWN_HEIGHT: f32 = 15.0;

const SNOW_SWAY: f32 = 0.01;
const WIND_SWAY: f32 = 0.02;
const FOG_DRIFT_XZ: f32 = 0.004;
const FOG_DRIFT_Y: f32 = 0.0015;

/// Velocity data, shaped by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticleMotion {
    /// Per-particle fall speed; snow also sways along X.
    Fall { speeds: Vec<f32>, sway: bool },
    /// Per-particle drift vector (fog).
    Drift { velocities: Vec<Vec3> },
    /// One shared horizontal speed (wind).
    Gust { speed: f32 },
}

#[derive(Debug)]
pub struct ParticleField {
    pub handle: PointsHandle,
    pub positions: Vec<Vec3>,
    pub motion: ParticleMotion,
    volume: ScatterVolume,
}

/// Positions and motion for a new field, before it is added to the scene.
#[derive(Debug, Clone)]
pub struct ParticleSpawn {
    pub positions: Vec<Vec3>,
    pub motion: ParticleMotion,
    pub volume: ScatterVolume,
}

impl ParticleSpawn {
    pub fn rain<R: Rng + ?Sized>(rng: &mut R, count: usize, fall_speed: f32) -> Self {
        Self {
            positions: generate_scattered_points(rng, count, PRECIPITATION_VOLUME),
            motion: ParticleMotion::Fall {
                speeds: vec![fall_speed; count],
                sway: false,
            },
            volume: PRECIPITATION_VOLUME,
        }
    }

    pub fn snow<R: Rng + ?Sized>(rng: &mut R, count: usize, fall_speed: f32) -> Self {
        Self {
            positions: generate_scattered_points(rng, count, PRECIPITATION_VOLUME),
            motion: ParticleMotion::Fall {
                speeds: vec![fall_speed; count],
                sway: true,
            },
            volume: PRECIPITATION_VOLUME,
        }
    }

    pub fn fog<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        let positions = generate_scattered_points(rng, count, FOG_VOLUME);
        let velocities = (0..count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * 2.0 * FOG_DRIFT_XZ,
                    (rng.gen::<f32>() - 0.5) * 2.0 * FOG_DRIFT_Y,
                    (rng.gen::<f32>() - 0.5) * 2.0 * FOG_DRIFT_XZ,
                )
            })
            .collect();
        Self {
            positions,
            motion: ParticleMotion::Drift { velocities },
            volume: FOG_VOLUME,
        }
    }

    pub fn wind<R: Rng + ?Sized>(rng: &mut R, count: usize, speed: f32) -> Self {
        Self {
            positions: generate_scattered_points(rng, count, WIND_VOLUME),
            motion: ParticleMotion::Gust { speed },
            volume: WIND_VOLUME,
        }
    }

    pub fn into_field(self, handle: PointsHandle) -> ParticleField {
        ParticleField {
            handle,
            positions: self.positions,
            motion: self.motion,
            volume: self.volume,
        }
    }
}

impl ParticleField {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn volume(&self) -> ScatterVolume {
        self.volume
    }

    /// Advance every particle by one frame and recycle the ones that left the volume.
    pub fn tick<R: Rng + ?Sized>(&mut self, frame_scale: f32, time_secs: f32, rng: &mut R) {
        let volume = self.volume;
        match &self.motion {
            ParticleMotion::Fall { speeds, sway } => {
                for (i, (p, speed)) in self.positions.iter_mut().zip(speeds).enumerate() {
                    p.y -= speed * frame_scale;
                    if *sway {
                        p.x += (time_secs + i as f32).sin() * SNOW_SWAY * frame_scale;
                    }
                    if p.y < FLOOR_HEIGHT {
                        p.y = RESPAWN_HEIGHT;
                        p.x = volume.sample_x(rng);
                        p.z = volume.sample_z(rng);
                    }
                }
            }
            ParticleMotion::Drift { velocities } => {
                for (p, v) in self.positions.iter_mut().zip(velocities) {
                    *p += *v * frame_scale;
                    wrap_axis(&mut p.x, -volume.half_x, volume.half_x);
                    wrap_axis(&mut p.y, volume.y_min, volume.y_max);
                    wrap_axis(&mut p.z, -volume.half_z, volume.half_z);
                }
            }
            ParticleMotion::Gust { speed } => {
                for (i, p) in self.positions.iter_mut().enumerate() {
                    p.x += speed * frame_scale;
                    p.y += (time_secs + i as f32).sin() * WIND_SWAY * frame_scale;
                    if p.x > volume.half_x {
                        p.x = -volume.half_x;
                        p.y = volume.sample_y(rng);
                        p.z = volume.sample_z(rng);
                    }
                }
            }
        }
    }
}

/// Past one edge, reappear at the other.
fn wrap_axis(value: &mut f32, min: f32, max: f32) {
    if *value > max {
        *value = min;
    } else if *value < min {
        *value = max;
    }
}
