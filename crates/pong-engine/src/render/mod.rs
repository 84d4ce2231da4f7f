//! Immediate-mode quad renderer.
//!
//! One fixed-capacity batch of textured quads per frame, flushed as a single
//! indexed draw call. Draw coordinates are transformed to clip space on the
//! CPU; the shader is a pass-through.
//!
//! Per-frame protocol:
//! - `begin_frame` clears the batch and resets the coordinate spaces
//! - `begin_camera`/`end_camera` bracket world-space drawing
//! - `begin_ui`/`end_ui` bracket screen-space overlay drawing
//! - `end_frame` uploads the batch and issues the frame's one draw call

mod batch;
mod camera;
mod font;
mod renderer;
mod spaces;

pub use batch::{BatchFull, FrameBatch, Quad, TextureSlot, UvRegion, Vertex, MAX_QUADS};
pub use camera::Camera2D;
pub use font::{FontAtlas, FontError, GlyphMetrics, GlyphQuad, TextAlign, ATLAS_SIZE};
pub use renderer::{FrameOutcome, Renderer};
pub use spaces::FrameSpaces;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{ColorRgba, Vec2, Viewport};

    // Frame protocol on the CPU side: the GPU submission consumes exactly
    // what these two structures agree on.
    #[test]
    fn one_rectangle_frame_yields_one_quad_and_six_indices() {
        let mut batch = FrameBatch::new();
        let mut spaces = FrameSpaces::new();

        // begin_frame
        batch.reset();
        spaces.reset(Viewport::new(640.0, 360.0));

        let quad = Quad::from_rect(
            spaces.mvp(),
            Vec2::ZERO,
            Vec2::splat(10.0),
            ColorRgba::WHITE,
            TextureSlot::None,
            UvRegion::FULL,
            0.0,
        );
        batch.push(quad).unwrap();

        assert_eq!(batch.count(), 1);
        assert_eq!(batch.index_count(), 6);

        // begin_frame of the next frame drops everything, however full the
        // previous frame was.
        batch.reset();
        spaces.reset(Viewport::new(640.0, 360.0));
        assert_eq!(batch.count(), 0);
    }
}
