use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::coords::{ColorRgba, Vec2};

/// Per-frame quad budget. Exceeding it is a caller contract violation, not a
/// condition the renderer grows out of.
pub const MAX_QUADS: usize = 1024;

/// Texture slot sampled by a quad.
///
/// Exactly one texture exists in this pipeline (the font atlas), so the slot
/// is a closed enum rather than a handle table. On the wire it is a single
/// float: `-1.0` marks an untextured vertex, slot indices count from 0.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextureSlot {
    #[default]
    None,
    FontAtlas,
}

impl TextureSlot {
    /// Value written into [`Vertex::tex`].
    #[inline]
    pub fn shader_index(self) -> f32 {
        match self {
            TextureSlot::None => -1.0,
            TextureSlot::FontAtlas => 0.0,
        }
    }
}

/// Texture-atlas sub-region as `(u_min, v_min)`..`(u_max, v_max)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvRegion {
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
}

impl UvRegion {
    /// The whole texture.
    pub const FULL: UvRegion = UvRegion::new(0.0, 0.0, 1.0, 1.0);

    #[inline]
    pub const fn new(u_min: f32, v_min: f32, u_max: f32, v_max: f32) -> Self {
        Self { u_min, v_min, u_max, v_max }
    }
}

/// Vertex layout (40 bytes per vertex):
///
///  offset  0  position  [f32; 3]   loc 0
///  offset 12  color     [f32; 4]   loc 1
///  offset 28  uv        [f32; 2]   loc 2
///  offset 36  tex       f32        loc 3
///
/// Positions are finished clip-space coordinates; the vertex shader passes
/// them through. The byte layout is a contract with the pipeline's
/// `VertexBufferLayout` and must not be reordered.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub tex: f32,
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // position (clip space)
        1 => Float32x4, // color
        2 => Float32x2, // uv
        3 => Float32    // texture slot, -1 = none
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Four vertices wound top-left, bottom-left, bottom-right, top-right in the
/// emitting space, drawn as two triangles via [`build_index_data`].
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Quad {
    pub vertices: [Vertex; 4],
}

impl Quad {
    /// Builds a quad from an axis-aligned rectangle in the emitting space.
    ///
    /// `position` is the corner with the smaller X and Y under the local
    /// Y-down naming; negative sizes flip the rectangle without validation.
    /// All four corners go through `mvp` on the CPU, so the batch can mix
    /// quads emitted under different coordinate spaces.
    pub fn from_rect(
        mvp: Mat4,
        position: Vec2,
        size: Vec2,
        color: ColorRgba,
        slot: TextureSlot,
        uv: UvRegion,
        depth: f32,
    ) -> Self {
        let corner = |x: f32, y: f32, u: f32, v: f32| -> Vertex {
            let clip: Vec4 = mvp * Vec4::new(x, y, depth, 1.0);
            Vertex {
                position: [clip.x, clip.y, clip.z],
                color: color.to_array(),
                uv: [u, v],
                tex: slot.shader_index(),
            }
        };

        Quad {
            vertices: [
                corner(position.x, position.y, uv.u_min, uv.v_min), // top-left
                corner(position.x, position.y + size.y, uv.u_min, uv.v_max), // bottom-left
                corner(position.x + size.x, position.y + size.y, uv.u_max, uv.v_max), // bottom-right
                corner(position.x + size.x, position.y, uv.u_max, uv.v_min), // top-right
            ],
        }
    }
}

/// Error returned when the frame's quad budget is exhausted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BatchFull;

impl fmt::Display for BatchFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame batch is full ({MAX_QUADS} quads)")
    }
}

impl std::error::Error for BatchFull {}

/// Fixed-capacity quad accumulator for one frame.
///
/// The backing storage always holds [`MAX_QUADS`] quads; `count` tracks how
/// many are live this frame. The full storage is uploaded to the GPU every
/// frame and the draw call covers only the live indices, trading upload
/// bandwidth for a single persistent buffer size.
pub struct FrameBatch {
    quads: Box<[Quad]>,
    count: usize,
}

impl FrameBatch {
    pub fn new() -> Self {
        Self {
            quads: vec![Quad::zeroed(); MAX_QUADS].into_boxed_slice(),
            count: 0,
        }
    }

    /// Number of quads emitted since the last reset.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of indices the frame's draw call covers: 6 per live quad.
    #[inline]
    pub fn index_count(&self) -> u32 {
        (self.count * 6) as u32
    }

    /// Drops all live quads. Called exactly once per frame, at frame begin.
    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Appends a quad, refusing once the budget is exhausted.
    pub fn push(&mut self, quad: Quad) -> Result<(), BatchFull> {
        if self.count == MAX_QUADS {
            return Err(BatchFull);
        }
        self.quads[self.count] = quad;
        self.count += 1;
        Ok(())
    }

    /// Raw bytes of the whole fixed-size storage, live or not.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.quads)
    }
}

impl Default for FrameBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Precomputes the index stream for the full batch capacity.
///
/// Each quad contributes the pattern `{0, 1, 2, 0, 2, 3}` offset by its base
/// vertex. With 1024 quads the largest index is 4095, comfortably inside
/// `u16`. Built once at renderer init; immutable thereafter.
pub fn build_index_data() -> Vec<u16> {
    let mut indices = Vec::with_capacity(MAX_QUADS * 6);
    for quad in 0..MAX_QUADS as u16 {
        let base = quad * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Quad {
        Quad::from_rect(
            Mat4::IDENTITY,
            Vec2::ZERO,
            Vec2::splat(1.0),
            ColorRgba::WHITE,
            TextureSlot::None,
            UvRegion::FULL,
            0.0,
        )
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn accepts_exactly_max_quads() {
        let mut batch = FrameBatch::new();
        for _ in 0..MAX_QUADS {
            batch.push(unit_quad()).unwrap();
        }
        assert_eq!(batch.count(), MAX_QUADS);
    }

    #[test]
    fn refuses_quad_beyond_capacity() {
        let mut batch = FrameBatch::new();
        for _ in 0..MAX_QUADS {
            batch.push(unit_quad()).unwrap();
        }
        assert_eq!(batch.push(unit_quad()), Err(BatchFull));
        assert_eq!(batch.count(), MAX_QUADS);
    }

    #[test]
    fn reset_clears_count_regardless_of_fill() {
        let mut batch = FrameBatch::new();
        for _ in 0..37 {
            batch.push(unit_quad()).unwrap();
        }
        batch.reset();
        assert_eq!(batch.count(), 0);
        assert_eq!(batch.index_count(), 0);
    }

    #[test]
    fn index_count_is_six_per_quad() {
        let mut batch = FrameBatch::new();
        batch.push(unit_quad()).unwrap();
        assert_eq!(batch.index_count(), 6);
        batch.push(unit_quad()).unwrap();
        assert_eq!(batch.index_count(), 12);
    }

    // ── layout contracts ──────────────────────────────────────────────────

    #[test]
    fn vertex_is_40_bytes() {
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
        assert_eq!(std::mem::size_of::<Quad>(), 160);
    }

    #[test]
    fn upload_covers_full_capacity() {
        let batch = FrameBatch::new();
        assert_eq!(batch.as_bytes().len(), MAX_QUADS * std::mem::size_of::<Quad>());
    }

    #[test]
    fn index_pattern_per_quad() {
        let indices = build_index_data();
        assert_eq!(indices.len(), MAX_QUADS * 6);
        assert_eq!(&indices[0..6], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(&indices[6..12], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(indices[MAX_QUADS * 6 - 1], (MAX_QUADS as u16 - 1) * 4 + 3);
    }

    // ── emission ──────────────────────────────────────────────────────────

    #[test]
    fn winding_is_tl_bl_br_tr_under_identity() {
        let q = Quad::from_rect(
            Mat4::IDENTITY,
            Vec2::ZERO,
            Vec2::new(10.0, 20.0),
            ColorRgba::WHITE,
            TextureSlot::None,
            UvRegion::FULL,
            0.0,
        );
        assert_eq!(q.vertices[0].position, [0.0, 0.0, 0.0]); // top-left
        assert_eq!(q.vertices[1].position, [0.0, 20.0, 0.0]); // bottom-left
        assert_eq!(q.vertices[2].position, [10.0, 20.0, 0.0]); // bottom-right
        assert_eq!(q.vertices[3].position, [10.0, 0.0, 0.0]); // top-right
    }

    #[test]
    fn uv_region_maps_to_corners() {
        let q = Quad::from_rect(
            Mat4::IDENTITY,
            Vec2::ZERO,
            Vec2::splat(1.0),
            ColorRgba::WHITE,
            TextureSlot::FontAtlas,
            UvRegion::new(0.1, 0.2, 0.9, 0.8),
            0.0,
        );
        assert_eq!(q.vertices[0].uv, [0.1, 0.2]);
        assert_eq!(q.vertices[1].uv, [0.1, 0.8]);
        assert_eq!(q.vertices[2].uv, [0.9, 0.8]);
        assert_eq!(q.vertices[3].uv, [0.9, 0.2]);
    }

    #[test]
    fn texture_slot_sentinel() {
        let solid = unit_quad();
        assert_eq!(solid.vertices[0].tex, -1.0);

        let textured = Quad::from_rect(
            Mat4::IDENTITY,
            Vec2::ZERO,
            Vec2::splat(1.0),
            ColorRgba::WHITE,
            TextureSlot::FontAtlas,
            UvRegion::FULL,
            0.0,
        );
        assert_eq!(textured.vertices[0].tex, 0.0);
    }

    #[test]
    fn depth_flows_through_identity_transform() {
        let q = Quad::from_rect(
            Mat4::IDENTITY,
            Vec2::ZERO,
            Vec2::splat(1.0),
            ColorRgba::WHITE,
            TextureSlot::None,
            UvRegion::FULL,
            7.5,
        );
        for v in &q.vertices {
            assert_eq!(v.position[2], 7.5);
        }
    }
}
