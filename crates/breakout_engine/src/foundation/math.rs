//! Math utilities and types
//!
//! Provides the small set of math types the 2D text pipeline works with.

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Integer 2D vector type, used for pixel sizes and bearings
pub type IVec2 = Vector2<i32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Screen-space orthographic projection with the origin at the top-left corner
///
/// Maps `x` in `0..width` and `y` in `0..height` (y growing downwards) to
/// normalized device coordinates, matching the layout convention used by
/// the text renderer.
pub fn screen_orthographic(width: u32, height: u32) -> Mat4 {
    Mat4::new_orthographic(0.0, width as f32, height as f32, 0.0, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_screen_orthographic_corners() {
        let projection = screen_orthographic(800, 600);

        let top_left = projection.transform_point(&Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(top_left.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(top_left.y, 1.0, epsilon = 1e-6);

        let bottom_right = projection.transform_point(&Point3::new(800.0, 600.0, 0.0));
        assert_relative_eq!(bottom_right.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(bottom_right.y, -1.0, epsilon = 1e-6);
    }
}
