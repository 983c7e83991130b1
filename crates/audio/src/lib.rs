//! Weather ambience playback.
//!
//! `SoundDirector` decides what should be audible (one looping track per
//! weather kind, volume from intensity, playback held back until the user has
//! interacted at least once); a `SoundOutput` does the actual playing.
//! `KiraOutput` plays through Kira, `NullOutput` is silent.

mod director;
mod output;

pub use director::*;
pub use output::*;

// Re-export for convenience
pub use kira;
