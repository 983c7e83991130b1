//! Lightning bolt and strike geometry.
//!
//! A bolt is a jagged polyline between two points. Interior vertices are pushed
//! sideways (X/Z) by a random amount whose envelope is `sin(t·π)·1.5`, so both
//! endpoints stay where they were asked to be and the middle wanders the most.
//! A strike is one main bolt from the cloud base towards the ground plus a few
//! shorter branches forking off partway down.

use glam::Vec3;
use rand::Rng;

pub const BOLT_MIN_SEGMENTS: usize = 8;
pub const BOLT_MAX_SEGMENTS: usize = 13;
pub const BOLT_MIN_LIFETIME_MS: f32 = 80.0;
pub const BOLT_MAX_LIFETIME_MS: f32 = 200.0;

/// Peak lateral displacement at the bolt's midpoint.
const JITTER_AMPLITUDE: f32 = 1.5;

/// Generated bolt polyline with its own lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct LightningBolt {
    pub points: Vec<Vec3>,
    pub lifetime_ms: f32,
}

impl LightningBolt {
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn start(&self) -> Vec3 {
        self.points.first().copied().unwrap_or(Vec3::ZERO)
    }

    pub fn end(&self) -> Vec3 {
        self.points.last().copied().unwrap_or(Vec3::ZERO)
    }
}

/// One lightning event: main bolt, branches and where to put the flash.
#[derive(Debug, Clone)]
pub struct LightningStrike {
    pub main: Option<LightningBolt>,
    pub branches: Vec<LightningBolt>,
    /// Flash light position (2 units below the bolt top).
    pub origin: Vec3,
    /// Strike position on the ground plane.
    pub ground: Vec3,
}

impl LightningStrike {
    /// Main bolt followed by every branch.
    pub fn bolts(&self) -> impl Iterator<Item = &LightningBolt> {
        self.main.iter().chain(self.branches.iter())
    }
}

/// Build a jagged bolt from `start` to `end`; `None` on non-finite input.
pub fn generate_lightning_bolt<R: Rng + ?Sized>(
    rng: &mut R,
    start: Vec3,
    end: Vec3,
) -> Option<LightningBolt> {
    if !start.is_finite() || !end.is_finite() {
        log::debug!("Rejected lightning bolt with non-finite endpoints {start} -> {end}");
        return None;
    }

    let segments = rng.gen_range(BOLT_MIN_SEGMENTS..=BOLT_MAX_SEGMENTS);
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let mut p = start.lerp(end, t);
        if i > 0 && i < segments {
            let jitter = (t * std::f32::consts::PI).sin() * JITTER_AMPLITUDE;
            p.x += (rng.gen::<f32>() - 0.5) * jitter;
            p.z += (rng.gen::<f32>() - 0.5) * jitter;
        }
        points.push(p);
    }

    Some(LightningBolt {
        points,
        lifetime_ms: rng.gen_range(BOLT_MIN_LIFETIME_MS..BOLT_MAX_LIFETIME_MS),
    })
}

/// Number of branch bolts for a strike at `intensity` (0..=100).
pub fn branch_count(intensity: f32) -> usize {
    1 + (intensity.clamp(0.0, 100.0) / 100.0 * 3.0).floor() as usize
}

/// Random strike over the scene, with branches scaled by `intensity` (0..=100).
pub fn generate_lightning_strike<R: Rng + ?Sized>(rng: &mut R, intensity: f32) -> LightningStrike {
    let strike_x = (rng.gen::<f32>() - 0.5) * 25.0;
    let strike_z = (rng.gen::<f32>() - 0.5) * 15.0 - 5.0;
    let start_y = 8.0 + rng.gen::<f32>() * 4.0;
    let end_y = -2.0 + rng.gen::<f32>() * 4.0;

    let main_end = Vec3::new(
        strike_x + (rng.gen::<f32>() - 0.5) * 3.0,
        end_y,
        strike_z + (rng.gen::<f32>() - 0.5) * 2.0,
    );
    let main = generate_lightning_bolt(rng, Vec3::new(strike_x, start_y, strike_z), main_end);

    let branches = (0..branch_count(intensity))
        .filter_map(|_| {
            let fork = 0.3 + rng.gen::<f32>() * 0.4;
            let branch_y = start_y - (start_y - end_y) * fork;
            let branch_end = Vec3::new(
                strike_x + (rng.gen::<f32>() - 0.5) * 6.0,
                branch_y - 2.0 - rng.gen::<f32>() * 3.0,
                strike_z + (rng.gen::<f32>() - 0.5) * 4.0,
            );
            let branch_start = Vec3::new(
                strike_x + (rng.gen::<f32>() - 0.5) * 0.5,
                branch_y,
                strike_z + (rng.gen::<f32>() - 0.5) * 0.5,
            );
            generate_lightning_bolt(rng, branch_start, branch_end)
        })
        .collect();

    LightningStrike {
        main,
        branches,
        origin: Vec3::new(strike_x, start_y - 2.0, strike_z),
        ground: Vec3::new(strike_x, 0.0, strike_z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bolt_rejects_non_finite_coordinates() {
        let mut rng = StdRng::seed_from_u64(1);
        let ok = Vec3::new(0.0, 10.0, 0.0);
        for bad in [
            Vec3::new(f32::NAN, 0.0, 0.0),
            Vec3::new(0.0, f32::INFINITY, 0.0),
            Vec3::new(0.0, 0.0, f32::NEG_INFINITY),
        ] {
            assert!(generate_lightning_bolt(&mut rng, bad, ok).is_none());
            assert!(generate_lightning_bolt(&mut rng, ok, bad).is_none());
        }
    }

    #[test]
    fn bolt_segments_and_lifetime_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            let bolt = generate_lightning_bolt(
                &mut rng,
                Vec3::new(1.0, 10.0, -3.0),
                Vec3::new(2.0, -1.0, -4.0),
            )
            .unwrap();
            assert!((BOLT_MIN_SEGMENTS..=BOLT_MAX_SEGMENTS).contains(&bolt.segment_count()));
            assert!(bolt.lifetime_ms >= BOLT_MIN_LIFETIME_MS && bolt.lifetime_ms <= BOLT_MAX_LIFETIME_MS);
        }
    }

    #[test]
    fn bolt_endpoints_are_fixed_and_jitter_follows_envelope() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Vec3::new(0.0, 10.0, 0.0);
        let end = Vec3::new(0.0, 0.0, 0.0);
        for _ in 0..100 {
            let bolt = generate_lightning_bolt(&mut rng, start, end).unwrap();
            assert_eq!(bolt.start(), start);
            assert_eq!(bolt.end(), end);
            let n = bolt.segment_count() as f32;
            for (i, p) in bolt.points.iter().enumerate() {
                let t = i as f32 / n;
                let envelope = (t * std::f32::consts::PI).sin() * JITTER_AMPLITUDE * 0.5;
                assert!(p.x.abs() <= envelope + 1e-4);
                assert!(p.z.abs() <= envelope + 1e-4);
            }
        }
    }

    #[test]
    fn strike_has_main_bolt_and_intensity_scaled_branches() {
        let mut rng = StdRng::seed_from_u64(4);
        for (intensity, expected) in [(0.0, 1), (33.0, 1), (34.0, 2), (50.0, 2), (100.0, 4)] {
            let strike = generate_lightning_strike(&mut rng, intensity);
            assert!(strike.main.is_some());
            assert_eq!(strike.branches.len(), expected);
            assert_eq!(strike.bolts().count(), expected + 1);
        }
    }

    #[test]
    fn strike_location_stays_over_the_scene() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let strike = generate_lightning_strike(&mut rng, 70.0);
            assert!(strike.ground.x.abs() <= 12.5);
            assert!(strike.ground.z >= -12.5 && strike.ground.z <= 2.5);
            let main = strike.main.as_ref().unwrap();
            assert!(main.start().y >= 8.0 && main.start().y <= 12.0);
            assert!(main.end().y >= -2.0 && main.end().y <= 2.0);
            assert!((strike.origin.y - (main.start().y - 2.0)).abs() < 1e-5);
        }
    }

    #[test]
    fn main_bolt_starts_above_and_lands_near_the_strike_point() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..200 {
            let strike = generate_lightning_strike(&mut rng, 40.0);
            let main = strike.main.as_ref().unwrap();
            assert_eq!(main.start().x, strike.ground.x);
            assert_eq!(main.start().z, strike.ground.z);
            assert!((main.end().x - strike.ground.x).abs() <= 1.5);
            assert!((main.end().z - strike.ground.z).abs() <= 1.0);
            for branch in &strike.branches {
                assert!(branch.start().y < main.start().y);
                assert!(branch.end().y < branch.start().y);
            }
        }
    }
}
