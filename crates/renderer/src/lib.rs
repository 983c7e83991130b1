//! Render capability for Fogbound: the scene interface the weather systems
//! draw through, plus a headless in-memory backend.

pub mod headless;
pub mod scene;

pub use headless::*;
pub use scene::*;
