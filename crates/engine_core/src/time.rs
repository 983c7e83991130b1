//! Time management for the frame loop.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
///
/// The clock can be driven by the wall clock (`update`) or stepped manually
/// (`advance`), which is how fixed-rate simulation and tests drive it. All
/// weather scheduling reads `now_ms`, a monotonic millisecond timeline that
/// starts at zero.
#[derive(Debug)]
pub struct Time {
    /// Time of the last wall-clock frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for simulation (default 60 Hz).
    fixed_timestep: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
        }
    }

    /// Update timing from the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.step(delta);
    }

    /// Step the clock by an explicit amount (fixed-rate loops and tests).
    pub fn advance(&mut self, delta: Duration) {
        self.last_frame = Instant::now();
        self.step(delta);
    }

    fn step(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get total elapsed time as Duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Milliseconds since start; the timeline used for strikes, fades and bolt ages.
    pub fn now_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Delta expressed in 60 Hz frames (1.0 at exactly 60 FPS).
    ///
    /// Effect speeds are tuned per display frame; multiplying by this keeps
    /// them stable when the tick rate differs.
    pub fn frame_scale(&self) -> f32 {
        self.delta.as_secs_f32() * 60.0
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep.
    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz.max(1.0));
    }
}
