use std::path::Path;

use anyhow::Result;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::coords::{ColorRgba, Vec2, Viewport};
use crate::device::{Gpu, SurfaceErrorAction};

use super::batch::{FrameBatch, Quad, TextureSlot, UvRegion, Vertex, MAX_QUADS, build_index_data};
use super::camera::Camera2D;
use super::font::{ATLAS_SIZE, FontAtlas, FontError, TextAlign};
use super::spaces::FrameSpaces;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Result of flushing a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The frame was drawn and queued for presentation.
    Presented,
    /// Transient surface trouble; the frame was dropped, try again next loop.
    Skipped,
    /// The surface is gone for good (commonly OOM); shut down.
    Fatal,
}

/// Immediate-mode batched quad renderer.
///
/// Owns the whole GPU side of a frame: one pipeline, one persistent
/// vertex/index buffer pair sized for [`MAX_QUADS`], the font atlas texture,
/// and a depth buffer. Exactly one instance exists for the process lifetime,
/// constructed after the GPU context and passed by reference to whatever
/// draws (no ambient singleton).
///
/// Call ordering contract (caller discipline, unguarded): `begin_frame`
/// before any draw call, `end_frame` exactly once afterwards, and
/// `begin_camera`/`begin_ui` balanced with their `end_*`.
pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,

    atlas_texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,

    depth_view: wgpu::TextureView,
    depth_size: PhysicalSize<u32>,

    batch: FrameBatch,
    spaces: FrameSpaces,
    font: Option<FontAtlas>,

    clear_color: ColorRgba,
    viewport: Viewport,
}

impl Renderer {
    /// Builds every GPU resource up front.
    ///
    /// Nothing here is lazily created: the pipeline, buffers, atlas texture
    /// and bindings are all immutable for the renderer's lifetime (only the
    /// depth buffer follows resizes), so deferred construction would just
    /// add unreachable states.
    pub fn new(gpu: &Gpu) -> Result<Self> {
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pong quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pong quad bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pong quad pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pong quad pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(straight_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Flipped rects (negative sizes) reverse winding; draw both.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pong quad vbo"),
            size: (MAX_QUADS * std::mem::size_of::<Quad>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Index stream is the fixed per-quad pattern for the full capacity,
        // written once and never touched again.
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pong quad ibo"),
            contents: bytemuck::cast_slice(&build_index_data()),
            usage: wgpu::BufferUsages::INDEX,
        });

        let atlas_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pong font atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let atlas_view = atlas_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pong atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pong quad bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let depth_size = gpu.size();
        let depth_view = create_depth_view(device, depth_size);

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            atlas_texture,
            bind_group,
            depth_view,
            depth_size,
            batch: FrameBatch::new(),
            spaces: FrameSpaces::new(),
            font: None,
            clear_color: ColorRgba::BLACK,
            viewport: Viewport::default(),
        })
    }

    /// Background color applied when the frame's render pass begins.
    pub fn set_clear_color(&mut self, color: ColorRgba) {
        self.clear_color = color;
    }

    /// Whether a font atlas is resident. Text calls without one panic.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Bakes `bytes` (TTF/OTF) at `px_size` and uploads the atlas page,
    /// replacing any previously resident font.
    pub fn load_font(
        &mut self,
        queue: &wgpu::Queue,
        bytes: &[u8],
        px_size: f32,
    ) -> Result<(), FontError> {
        let atlas = FontAtlas::bake(bytes, px_size)?;

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.atlas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            atlas.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(ATLAS_SIZE),
                rows_per_image: Some(ATLAS_SIZE),
            },
            wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
        );

        log::info!("font atlas baked at {px_size}px");
        self.font = Some(atlas);
        Ok(())
    }

    /// Reads a font file and loads it via [`load_font`](Renderer::load_font).
    ///
    /// A missing or unreadable file is a recoverable error: the caller may
    /// log it and keep running without text overlays.
    pub fn load_font_file(
        &mut self,
        queue: &wgpu::Queue,
        path: &Path,
        px_size: f32,
    ) -> Result<(), FontError> {
        let bytes = std::fs::read(path)
            .map_err(|e| FontError(format!("{}: {e}", path.display())))?;
        self.load_font(queue, &bytes, px_size)
    }

    // ── frame protocol ─────────────────────────────────────────────────────

    /// Opens a frame: empties the batch and rebuilds the world projection
    /// for the current drawable size.
    pub fn begin_frame(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.batch.reset();
        self.spaces.reset(viewport);
    }

    /// Enters world/camera space.
    pub fn begin_camera(&mut self, camera: Camera2D) {
        self.spaces.begin_camera(&camera);
    }

    /// Leaves world/camera space.
    pub fn end_camera(&mut self) {
        self.spaces.end_camera();
    }

    /// Enters screen-space overlay drawing.
    pub fn begin_ui(&mut self) {
        self.spaces.begin_ui(self.viewport);
    }

    /// Leaves screen-space overlay drawing.
    pub fn end_ui(&mut self) {
        self.spaces.end_ui();
    }

    /// Emits one solid quad in the current space.
    ///
    /// `position` names the corner with the smaller X and Y (top-left under
    /// a Y-down reading); negative sizes flip the rectangle unvalidated.
    ///
    /// Panics when the frame's quad budget is exhausted; the capacity is a
    /// deliberate fixed budget, not a soft limit.
    pub fn draw_rectangle(&mut self, position: Vec2, size: Vec2, color: ColorRgba) {
        self.draw_rectangle_ex(position, size, color, TextureSlot::None, UvRegion::FULL, 0.0);
    }

    /// Emits one quad with explicit texture slot, UV region and depth.
    pub fn draw_rectangle_ex(
        &mut self,
        position: Vec2,
        size: Vec2,
        color: ColorRgba,
        slot: TextureSlot,
        uv: UvRegion,
        depth: f32,
    ) {
        let quad = Quad::from_rect(self.spaces.mvp(), position, size, color, slot, uv, depth);
        self.batch
            .push(quad)
            .expect("ran out of space for more quads");
    }

    /// Emits one textured quad per glyph of `text`, aligned around the
    /// pixel-snapped `position`.
    ///
    /// Panics when no font is resident or a character is outside the baked
    /// range. Both are caller contract violations, not runtime conditions.
    pub fn draw_text(&mut self, position: Vec2, text: &str, color: ColorRgba, align: TextAlign) {
        let font = self
            .font
            .as_ref()
            .expect("draw_text called before a font was loaded");
        let mvp = self.spaces.mvp();

        for glyph in font.layout(position, text, align) {
            let quad = Quad::from_rect(
                mvp,
                glyph.position,
                glyph.size,
                color,
                TextureSlot::FontAtlas,
                glyph.uv,
                0.0,
            );
            self.batch
                .push(quad)
                .expect("ran out of space for more quads");
        }
    }

    /// Total advance width of `text` at the resident font's size.
    ///
    /// Panics when no font is resident.
    pub fn measure_text(&self, text: &str) -> f32 {
        self.font
            .as_ref()
            .expect("measure_text called before a font was loaded")
            .measure(text)
    }

    /// Number of quads emitted since `begin_frame`.
    pub fn quad_count(&self) -> usize {
        self.batch.count()
    }

    /// Closes the frame: uploads the full fixed-size vertex buffer, records
    /// the frame's single indexed draw call, submits and presents.
    ///
    /// The whole capacity is uploaded every frame regardless of the live
    /// count; the draw call covers only `6 * count` indices.
    pub fn end_frame(&mut self, gpu: &mut Gpu) -> FrameOutcome {
        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface is irrecoverably lost");
                        FrameOutcome::Fatal
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        FrameOutcome::Skipped
                    }
                };
            }
        };

        self.ensure_depth(gpu);
        gpu.queue()
            .write_buffer(&self.vertex_buffer, 0, self.batch.as_bytes());

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pong quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.clear_color.r as f64,
                            g: self.clear_color.g as f64,
                            b: self.clear_color.b as f64,
                            a: self.clear_color.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..self.batch.index_count(), 0, 0..1);
        }

        gpu.submit(frame);
        FrameOutcome::Presented
    }

    /// Recreates the depth buffer when the drawable size changed.
    fn ensure_depth(&mut self, gpu: &Gpu) {
        let size = gpu.size();
        if size == self.depth_size {
            return;
        }
        self.depth_view = create_depth_view(gpu.device(), size);
        self.depth_size = size;
    }
}

fn create_depth_view(device: &wgpu::Device, size: PhysicalSize<u32>) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("pong depth buffer"),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
