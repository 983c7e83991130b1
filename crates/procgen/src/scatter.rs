//! Uniform point scattering for particle volumes (rain, snow, fog, wind).

use glam::Vec3;
use rand::Rng;

/// Axis-aligned box that particles are spawned into and recycled within.
///
/// X and Z are centred on the origin (`±half_x`, `±half_z`); Y is an absolute
/// range because precipitation starts above the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterVolume {
    pub half_x: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub half_z: f32,
}

impl ScatterVolume {
    pub const fn new(half_x: f32, y_min: f32, y_max: f32, half_z: f32) -> Self {
        Self {
            half_x,
            y_min,
            y_max,
            half_z,
        }
    }

    /// One uniform position inside the volume.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            self.sample_x(rng),
            self.sample_y(rng),
            self.sample_z(rng),
        )
    }

    pub fn sample_x<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        (rng.gen::<f32>() - 0.5) * 2.0 * self.half_x
    }

    pub fn sample_y<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.y_min + rng.gen::<f32>() * (self.y_max - self.y_min)
    }

    pub fn sample_z<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        (rng.gen::<f32>() - 0.5) * 2.0 * self.half_z
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x.abs() <= self.half_x
            && p.y >= self.y_min
            && p.y <= self.y_max
            && p.z.abs() <= self.half_z
    }
}

/// `count` independent uniform positions inside `volume`.
pub fn generate_scattered_points<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    volume: ScatterVolume,
) -> Vec<Vec3> {
    (0..count).map(|_| volume.sample(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scattered_points_stay_inside_volume() {
        let mut rng = StdRng::seed_from_u64(7);
        let volume = ScatterVolume::new(15.0, 0.0, 20.0, 15.0);
        let points = generate_scattered_points(&mut rng, 2000, volume);
        assert_eq!(points.len(), 2000);
        assert!(points.iter().all(|p| volume.contains(*p)));
    }

    #[test]
    fn scattered_points_cover_both_sides_of_origin() {
        let mut rng = StdRng::seed_from_u64(11);
        let volume = ScatterVolume::new(20.0, 0.0, 15.0, 20.0);
        let points = generate_scattered_points(&mut rng, 500, volume);
        assert!(points.iter().any(|p| p.x < 0.0) && points.iter().any(|p| p.x > 0.0));
        assert!(points.iter().any(|p| p.z < 0.0) && points.iter().any(|p| p.z > 0.0));
    }
}
