//! Transform helpers for the sprite pipeline's single global transform.
//!
//! Sprites are placed in pixel space with the origin at the top-left of the
//! viewport and y growing downward. The sprite shader rotates each vertex
//! about its pivot, applies the global transform, and only then maps pixels
//! to clip space using the viewport size. A global transform is therefore a
//! pixel-space to pixel-space matrix; identity draws sprites exactly where
//! their destination rectangles say.
//!
//! Composition follows `glam`: `a * b` applies `b` first, then `a`.

use crate::math::{Mat4, Quat, Vec2, Vec3};

/// Rotation by `angle` radians about `pivot`, in screen space.
///
/// Equivalent to `T(pivot) * Rz(angle) * T(-pivot)`.
pub fn rotate_about(angle: f32, pivot: Vec2) -> Mat4 {
    let pivot = Vec3::new(pivot.x, pivot.y, 0.0);
    Mat4::from_translation(pivot) * Mat4::from_rotation_z(angle) * Mat4::from_translation(-pivot)
}

/// CPU mirror of the per-vertex rotation done in the sprite shader.
pub fn rotate_point(point: Vec2, angle: f32, pivot: Vec2) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    let local = point - pivot;
    Vec2::new(
        local.x * cos - local.y * sin,
        local.x * sin + local.y * cos,
    ) + pivot
}

/// Translation, rotation (about z) and scale composed as `T * R * S`.
pub fn from_translation_rotation_scale(translation: Vec2, rotation: f32, scale: Vec2) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(scale.x, scale.y, 1.0),
        Quat::from_rotation_z(rotation),
        Vec3::new(translation.x, translation.y, 0.0),
    )
}

/// Orthographic projection for a pixel-space viewport with a top-left origin.
pub fn screen_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
}

/// Right-handed view matrix looking from `eye` towards `target`.
pub fn view(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// Column arrays suitable for a WGSL `mat4x4<f32>` uniform.
pub fn to_gpu(matrix: &Mat4) -> [[f32; 4]; 4] {
    matrix.to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_rotate_point_about_pivot() {
        let rotated = rotate_point(Vec2::new(20.0, 10.0), FRAC_PI_2, Vec2::new(10.0, 10.0));
        assert!(approx(rotated, Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn test_rotate_about_matches_rotate_point() {
        let pivot = Vec2::new(4.0, -3.0);
        let point = Vec2::new(12.0, 7.0);
        let angle = 0.7;
        let by_matrix = rotate_about(angle, pivot).transform_point3(Vec3::new(point.x, point.y, 0.0));
        assert!(approx(
            Vec2::new(by_matrix.x, by_matrix.y),
            rotate_point(point, angle, pivot)
        ));
    }

    #[test]
    fn test_pivot_is_fixed_point() {
        let pivot = Vec2::new(50.0, 60.0);
        assert!(approx(rotate_point(pivot, 1.3, pivot), pivot));
    }

    #[test]
    fn test_composition_order() {
        let translate = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let scale = Mat4::from_scale(Vec3::new(2.0, 2.0, 1.0));
        // Scale first, then translate.
        let p = (translate * scale).transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(12.0, 2.0, 0.0));
    }

    #[test]
    fn test_screen_projection_corners() {
        let proj = screen_projection(800.0, 600.0);
        let top_left = proj.project_point3(Vec3::new(0.0, 0.0, 0.0));
        let bottom_right = proj.project_point3(Vec3::new(800.0, 600.0, 0.0));
        assert!((top_left.x + 1.0).abs() < 1e-5 && (top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5 && (bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_trs_composition() {
        let m = from_translation_rotation_scale(Vec2::new(5.0, 5.0), 0.0, Vec2::new(3.0, 2.0));
        let p = m.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(8.0, 7.0, 0.0));
    }
}
