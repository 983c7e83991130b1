//! Core types and utilities shared by every Fogbound crate.
//!
//! This crate provides the foundational types used across the weather systems:
//! - Weather kind and intensity
//! - Transform and colour types
//! - Frame time and one-shot deferred timers

pub mod components;
pub mod time;
pub mod timer;
pub mod transform;
pub mod weather;

pub use components::*;
pub use time::*;
pub use timer::*;
pub use transform::*;
pub use weather::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
