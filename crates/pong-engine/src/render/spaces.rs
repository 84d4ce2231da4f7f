use glam::Mat4;

use crate::coords::Viewport;

use super::camera::Camera2D;

/// Projection/view state for the two drawing spaces of a frame.
///
/// World space: orthographic over the drawable, origin centered, +Y up,
/// pannable/zoomable via [`begin_camera`](FrameSpaces::begin_camera).
/// UI space: orthographic over the drawable, origin top-left, +Y down,
/// fixed. The diverging vertical conventions are intentional: gameplay
/// math keeps "up" positive while overlay text flows top-down.
///
/// Spaces are mutually exclusive and never nest; balancing begin/end calls
/// is the caller's responsibility. Transitions only swap matrices; the
/// batch keeps accumulating across them, so one draw call still covers the
/// whole frame.
pub struct FrameSpaces {
    projection: Mat4,
    view: Mat4,
    world_projection: Mat4,
}

impl FrameSpaces {
    pub fn new() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            world_projection: Mat4::IDENTITY,
        }
    }

    /// Frame-begin state: world projection for the current drawable size,
    /// identity view.
    pub fn reset(&mut self, viewport: Viewport) {
        self.world_projection = world_projection(viewport);
        self.projection = self.world_projection;
        self.view = Mat4::IDENTITY;
    }

    /// Enters camera space: subsequent emissions see the camera view over
    /// the world projection.
    pub fn begin_camera(&mut self, camera: &Camera2D) {
        self.view = camera.view_matrix();
    }

    /// Leaves camera space, returning to the identity view.
    pub fn end_camera(&mut self) {
        self.view = Mat4::IDENTITY;
    }

    /// Enters UI space: screen-pixel projection, identity view.
    pub fn begin_ui(&mut self, viewport: Viewport) {
        self.projection = ui_projection(viewport);
        self.view = Mat4::IDENTITY;
    }

    /// Leaves UI space, restoring the frame's world projection.
    pub fn end_ui(&mut self) {
        self.projection = self.world_projection;
        self.view = Mat4::IDENTITY;
    }

    /// Current emitter transform. Recomputed per emission; space changes
    /// within a frame are never cached across draw calls.
    #[inline]
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for FrameSpaces {
    fn default() -> Self {
        Self::new()
    }
}

/// World projection: drawable-sized orthographic box centered at the
/// origin, +Y toward the top of the screen, depth -100..100.
///
/// `orthographic_rh` maps depth into wgpu's 0..1 clip range.
fn world_projection(viewport: Viewport) -> Mat4 {
    let vp = viewport.clamped();
    let (hw, hh) = (vp.width / 2.0, vp.height / 2.0);
    Mat4::orthographic_rh(-hw, hw, -hh, hh, -100.0, 100.0)
}

/// UI projection: origin at the top-left corner, +Y down, one unit per
/// drawable pixel.
fn ui_projection(viewport: Viewport) -> Mat4 {
    let vp = viewport.clamped();
    Mat4::orthographic_rh(0.0, vp.width, vp.height, 0.0, -100.0, 100.0)
}
