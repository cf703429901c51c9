//! Spritebatch Core
//!
//! Ambient services shared by the sprite batching crates: logging, profiling,
//! batch configuration, hashing collections, and the small amount of 2D
//! geometry and transform math the renderer needs.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
pub mod transform;

pub use config::{BatchConfig, ConfigError};
pub use geometry::Rect;
