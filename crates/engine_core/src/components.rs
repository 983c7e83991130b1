//! Small value types shared by effects and the scene backend.

use serde::{Deserialize, Serialize};

/// Linear RGB colour, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

/// Fixed lifetime on the millisecond timeline (lightning bolts).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub created_at_ms: f64,
    pub duration_ms: f64,
}

impl Lifetime {
    pub fn new(created_at_ms: f64, duration_ms: f64) -> Self {
        Self {
            created_at_ms,
            duration_ms,
        }
    }

    pub fn age(&self, now_ms: f64) -> f64 {
        now_ms - self.created_at_ms
    }

    /// Age as a fraction of the lifetime (can exceed 1).
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return f64::INFINITY;
        }
        self.age(now_ms) / self.duration_ms
    }

    /// Strictly older than the lifetime.
    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.age(now_ms) > self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_rgb() {
        for hex in [0x1a1a2e, 0x9999cc, 0xffffff, 0x000000] {
            assert_eq!(Rgb::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn lifetime_expires_only_after_duration() {
        let life = Lifetime::new(1000.0, 100.0);
        assert!(!life.is_expired(1100.0));
        assert!(life.is_expired(1100.5));
        assert!((life.progress(1050.0) - 0.5).abs() < 1e-9);
    }
}
