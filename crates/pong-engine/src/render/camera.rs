use glam::{Mat4, Vec3};

use crate::coords::Vec2;

/// 2D world camera: a focal point and independent X/Y zoom.
///
/// Ephemeral by design: the game constructs one per frame (e.g. refitting
/// zoom to the drawable size) and hands it to `begin_camera`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2D {
    /// World-space focal point shifted to the viewport center.
    pub position: Vec2,
    /// Scale factors applied after the shift.
    pub zoom: Vec2,
}

impl Camera2D {
    #[inline]
    pub const fn new(position: Vec2, zoom: Vec2) -> Self {
        Self { position, zoom }
    }

    /// View matrix: translate content opposite the camera position, then
    /// scale by zoom. Depth is flattened to zero inside the camera, matching
    /// the 2D-only contract of this renderer.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(self.zoom.x, self.zoom.y, 0.0))
            * Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0))
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: Vec2::splat(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn identity_camera_leaves_points_alone() {
        let cam = Camera2D::default();
        let p = cam.view_matrix() * Vec4::new(3.0, -4.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(3.0, -4.0, 0.0, 1.0));
    }

    #[test]
    fn zoom_scales_after_position_shift() {
        let cam = Camera2D::new(Vec2::new(10.0, 0.0), Vec2::new(2.0, 2.0));
        let p = cam.view_matrix() * Vec4::new(15.0, 5.0, 0.0, 1.0);
        // Shift by -10 first, then double.
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 10.0);
    }

    #[test]
    fn per_axis_zoom_is_independent() {
        let cam = Camera2D::new(Vec2::ZERO, Vec2::new(2.0, 3.0));
        let p = cam.view_matrix() * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert_eq!(p.x, 2.0);
        assert_eq!(p.y, 3.0);
    }
}
