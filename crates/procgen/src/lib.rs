//! Procedural geometry for weather effects: particle scatter and lightning.

pub mod lightning;
pub mod scatter;

pub use lightning::*;
pub use scatter::*;
