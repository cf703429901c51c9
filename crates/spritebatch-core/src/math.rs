/// SIMD-accelerated `glam` types for CPU-side math.
///
/// Use these for sprite placement, pivots and the global transform. They are
/// re-exported at the module root as [`Vec2`], [`Vec4`], [`Mat4`] and friends.
///
/// ```
/// use spritebatch_core::math::{Mat4, Vec2, Vec3};
///
/// let position = Vec2::new(10.0, 20.0);
/// let transform = Mat4::from_translation(Vec3::new(position.x, position.y, 0.0));
/// assert_eq!(transform.w_axis.x, 10.0);
/// ```
pub mod fast {
    pub use glam::*;
}

pub use fast::*;
