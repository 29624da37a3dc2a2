use std::collections::HashMap;

use crate::batch::{
    BlendMode, CullMode, DepthMode, EffectId, GraphicsBackend, RenderState, SamplerMode,
    TextureHandle, TextureId, Vertex,
};
use crate::coords::{Mat4, Viewport};
use crate::render::{RenderCtx, RenderTarget};

/// Dynamic uniform offsets must be multiples of this on every backend.
const UNIFORM_ALIGN: u64 = 256;
const TRANSFORM_SIZE: u64 = std::mem::size_of::<[[f32; 4]; 4]>() as u64;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
enum ShaderKey {
    Default,
    Effect(EffectId, usize),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    blend: BlendMode,
    cull: CullMode,
    shader: ShaderKey,
}

/// One recorded `draw_indexed_triangles`.
#[derive(Debug, Copy, Clone)]
struct DrawOp {
    pipeline: PipelineKey,
    texture: TextureId,
    sampler: SamplerMode,
    transform: u32,
    first_index: u32,
    index_count: u32,
    base_vertex: i32,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// wgpu implementation of [`GraphicsBackend`].
///
/// Usage per frame:
/// 1. [`begin_frame`](Self::begin_frame) with the target size
/// 2. one or more `GeometryBatch::end(&mut backend)` calls record draws
/// 3. [`encode`](Self::encode) uploads the recorded geometry and issues one
///    `draw_indexed` per recorded draw into a single render pass
///
/// Depth modes are accepted but drawn without a depth attachment.
#[derive(Default)]
pub struct WgpuBackend {
    viewport: Viewport,

    // ── recording ────────────────────────────────────────────────────────
    ops: Vec<DrawOp>,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    transforms: Vec<[[f32; 4]; 4]>,
    state: RenderState,
    bound: Option<TextureId>,
    pass: Option<(EffectId, usize)>,

    // ── resources ────────────────────────────────────────────────────────
    textures: HashMap<TextureId, GpuTexture>,
    next_texture: u64,
    effects: HashMap<EffectId, Vec<wgpu::ShaderModule>>,
    next_effect: u64,

    // ── GPU state (lazy) ─────────────────────────────────────────────────
    pipeline_format: Option<wgpu::TextureFormat>,
    shader: Option<wgpu::ShaderModule>,
    transform_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    samplers: HashMap<SamplerMode, wgpu::Sampler>,
    texture_bind_groups: HashMap<(TextureId, SamplerMode), wgpu::BindGroup>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,
    ubo: Option<wgpu::Buffer>,
    ubo_capacity: usize,
    ubo_bind_group: Option<wgpu::BindGroup>,

    warned_depth: bool,
}

impl WgpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded draws and sets the size reported to batches.
    pub fn begin_frame(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.ops.clear();
        self.vertices.clear();
        self.indices.clear();
        self.transforms.clear();
        self.bound = None;
        self.pass = None;
    }

    /// Draws recorded since `begin_frame`.
    #[inline]
    pub fn recorded_draws(&self) -> usize {
        self.ops.len()
    }

    // ── resources ─────────────────────────────────────────────────────────

    /// Uploads premultiplied RGBA8 pixels as a new texture.
    pub fn upload_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> TextureHandle {
        self.next_texture += 1;
        let id = TextureId(self.next_texture);

        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("geobatch texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if width > 0 && height > 0 {
            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4),
                    rows_per_image: Some(height),
                },
                size,
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.textures.insert(id, GpuTexture { _texture: texture, view });
        log::debug!("uploaded texture {id:?} ({width}x{height})");

        TextureHandle::new(id, width, height)
    }

    pub fn release_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
        self.texture_bind_groups.retain(|(id, _), _| *id != texture);
    }

    /// Registers an effect: one WGSL module per pass, each exposing
    /// `vs_main`/`fs_main` with the same bindings as the built-in shader.
    pub fn register_effect(&mut self, ctx: &RenderCtx<'_>, passes: &[&str]) -> EffectId {
        self.next_effect += 1;
        let id = EffectId(self.next_effect);

        let modules = passes
            .iter()
            .enumerate()
            .map(|(i, src)| {
                ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&format!("geobatch effect {} pass {i}", id.0)),
                    source: wgpu::ShaderSource::Wgsl((*src).into()),
                })
            })
            .collect();

        self.effects.insert(id, modules);
        id
    }

    /// Drops an effect. Batches that still reference it fail at `end`.
    pub fn dispose_effect(&mut self, effect: EffectId) {
        self.effects.remove(&effect);
        self.pipelines
            .retain(|key, _| !matches!(key.shader, ShaderKey::Effect(id, _) if id == effect));
    }

    // ── encoding ──────────────────────────────────────────────────────────

    /// Uploads recorded geometry and draws it into `target`.
    pub fn encode(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if self.ops.is_empty() && target.clear.is_none() {
            return;
        }

        // Mutating methods must happen before borrowing pipelines/buffers immutably.
        self.ensure_layouts(ctx);
        let keys: Vec<PipelineKey> = self.ops.iter().map(|op| op.pipeline).collect();
        for key in keys {
            self.ensure_pipeline(ctx, key);
        }
        let bindings: Vec<(TextureId, SamplerMode)> =
            self.ops.iter().map(|op| (op.texture, op.sampler)).collect();
        for (texture, sampler) in bindings {
            self.ensure_texture_bind_group(ctx, texture, sampler);
        }
        self.upload_geometry(ctx);

        let load = match target.clear {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("geobatch pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if self.ops.is_empty() {
            return;
        }

        // Now take immutable borrows.
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };
        let Some(ubo_bind_group) = self.ubo_bind_group.as_ref() else { return };

        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);

        let mut current: Option<PipelineKey> = None;
        for op in &self.ops {
            let Some(pipeline) = self.pipelines.get(&op.pipeline) else { continue };
            let Some(bind_group) = self.texture_bind_groups.get(&(op.texture, op.sampler)) else {
                continue;
            };

            if current != Some(op.pipeline) {
                rpass.set_pipeline(pipeline);
                current = Some(op.pipeline);
            }
            let offset = (op.transform as u64 * UNIFORM_ALIGN) as u32;
            rpass.set_bind_group(0, ubo_bind_group, &[offset]);
            rpass.set_bind_group(1, bind_group, &[]);
            rpass.draw_indexed(
                op.first_index..op.first_index + op.index_count,
                op.base_vertex,
                0..1,
            );
        }
    }

    // ── lazy-init helpers ─────────────────────────────────────────────────

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format != Some(ctx.surface_format) {
            // Pipelines bake the target format.
            self.pipelines.clear();
            self.pipeline_format = Some(ctx.surface_format);
        }
        if self.pipeline_layout.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("geobatch shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/geometry.wgsl").into()),
        });

        let transform_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("geobatch transform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(TRANSFORM_SIZE),
                },
                count: None,
            }],
        });

        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("geobatch texture bgl"),
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

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("geobatch pipeline layout"),
            bind_group_layouts: &[&transform_bgl, &texture_bgl],
            immediate_size: 0,
        });

        self.shader = Some(shader);
        self.transform_bgl = Some(transform_bgl);
        self.texture_bgl = Some(texture_bgl);
        self.pipeline_layout = Some(pipeline_layout);

        self.ubo = None;
        self.ubo_capacity = 0;
        self.ubo_bind_group = None;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let Some(layout) = self.pipeline_layout.as_ref() else { return };
        let module = match key.shader {
            ShaderKey::Default => self.shader.as_ref(),
            ShaderKey::Effect(id, pass) => self.effects.get(&id).and_then(|m| m.get(pass)),
        };
        let Some(module) = module else {
            log::warn!("no shader for {:?}; draws skipped", key.shader);
            return;
        };

        let (front_face, cull_mode) = match key.cull {
            CullMode::None => (wgpu::FrontFace::Ccw, None),
            CullMode::Clockwise => (wgpu::FrontFace::Ccw, Some(wgpu::Face::Back)),
            CullMode::CounterClockwise => (wgpu::FrontFace::Ccw, Some(wgpu::Face::Front)),
        };

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("geobatch pipeline"),
            layout: Some(layout),

            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: blend_state(key.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipelines.insert(key, pipeline);
    }

    fn ensure_texture_bind_group(
        &mut self,
        ctx: &RenderCtx<'_>,
        texture: TextureId,
        mode: SamplerMode,
    ) {
        if self.texture_bind_groups.contains_key(&(texture, mode)) {
            return;
        }
        self.samplers
            .entry(mode)
            .or_insert_with(|| create_sampler(ctx, mode));

        let Some(bgl) = self.texture_bgl.as_ref() else { return };
        let Some(sampler) = self.samplers.get(&mode) else { return };
        let Some(gpu) = self.textures.get(&texture) else {
            log::warn!("draw references unknown texture {texture:?}; skipped");
            return;
        };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("geobatch texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&gpu.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.texture_bind_groups.insert((texture, mode), bind_group);
    }

    fn upload_geometry(&mut self, ctx: &RenderCtx<'_>) {
        if self.ops.is_empty() {
            return;
        }

        if self.vertices.len() > self.vbo_capacity || self.vbo.is_none() {
            let cap = self.vertices.len().next_power_of_two().max(1024);
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("geobatch vbo"),
                size: (cap * std::mem::size_of::<Vertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = cap;
        }

        if self.indices.len() > self.ibo_capacity || self.ibo.is_none() {
            let cap = self.indices.len().next_power_of_two().max(2048);
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("geobatch ibo"),
                size: (cap * std::mem::size_of::<u16>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = cap;
        }

        if self.transforms.len() > self.ubo_capacity || self.ubo_bind_group.is_none() {
            let Some(bgl) = self.transform_bgl.as_ref() else { return };
            let cap = self.transforms.len().next_power_of_two().max(8);
            let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("geobatch transform ubo"),
                size: cap as u64 * UNIFORM_ALIGN,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.ubo_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("geobatch transform bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &ubo,
                        offset: 0,
                        size: wgpu::BufferSize::new(TRANSFORM_SIZE),
                    }),
                }],
            }));
            self.ubo = Some(ubo);
            self.ubo_capacity = cap;
        }

        let (Some(vbo), Some(ibo), Some(ubo)) = (&self.vbo, &self.ibo, &self.ubo) else {
            return;
        };

        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.vertices));
        ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&self.indices));

        // One 256-byte slot per transform.
        let mut staging = vec![0u8; self.transforms.len() * UNIFORM_ALIGN as usize];
        for (slot, m) in staging
            .chunks_exact_mut(UNIFORM_ALIGN as usize)
            .zip(&self.transforms)
        {
            slot[..TRANSFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(m));
        }
        ctx.queue.write_buffer(ubo, 0, &staging);
    }

    /// 1x1 opaque white texture for untextured shapes.
    pub fn white_texture(&mut self, ctx: &RenderCtx<'_>) -> TextureHandle {
        self.upload_texture(ctx, 1, 1, &[255u8; 4])
    }
}

impl GraphicsBackend for WgpuBackend {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn apply_state(&mut self, state: &RenderState, transform: &Mat4) {
        if state.depth != DepthMode::None && !self.warned_depth {
            log::warn!("WgpuBackend: depth mode {:?} is not supported; drawing without depth", state.depth);
            self.warned_depth = true;
        }
        self.state = *state;
        self.transforms.push(transform.to_array_2d());
        self.bound = None;
        self.pass = None;
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.bound = Some(texture);
    }

    fn effect_pass_count(&self, effect: EffectId) -> Option<usize> {
        self.effects.get(&effect).map(Vec::len)
    }

    fn apply_effect_pass(&mut self, effect: EffectId, pass: usize) {
        self.pass = Some((effect, pass));
    }

    fn draw_indexed_triangles(&mut self, vertices: &[Vertex], indices: &[u16]) {
        let Some(texture) = self.bound else {
            log::warn!("WgpuBackend: draw without a bound texture ignored");
            return;
        };
        if indices.is_empty() {
            return;
        }

        let shader = match self.pass {
            Some((id, pass)) => ShaderKey::Effect(id, pass),
            None => ShaderKey::Default,
        };
        let transform = self.transforms.len().saturating_sub(1) as u32;

        let base_vertex = self.vertices.len() as i32;
        let first_index = self.indices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend_from_slice(indices);
        // Keep every draw's index range 4-byte aligned.
        if self.indices.len() % 2 != 0 {
            self.indices.push(0);
        }

        self.ops.push(DrawOp {
            pipeline: PipelineKey {
                blend: self.state.blend,
                cull: self.state.cull,
                shader,
            },
            texture,
            sampler: self.state.sampler,
            transform,
            first_index,
            index_count: indices.len() as u32,
            base_vertex,
        });
    }
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32x2  // uv
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

fn blend_state(mode: BlendMode) -> Option<wgpu::BlendState> {
    let component = |src, dst| wgpu::BlendComponent {
        src_factor: src,
        dst_factor: dst,
        operation: wgpu::BlendOperation::Add,
    };
    use wgpu::BlendFactor as F;
    match mode {
        BlendMode::AlphaBlend => Some(wgpu::BlendState {
            color: component(F::One, F::OneMinusSrcAlpha),
            alpha: component(F::One, F::OneMinusSrcAlpha),
        }),
        BlendMode::Additive => Some(wgpu::BlendState {
            color: component(F::SrcAlpha, F::One),
            alpha: component(F::SrcAlpha, F::One),
        }),
        BlendMode::NonPremultiplied => Some(wgpu::BlendState {
            color: component(F::SrcAlpha, F::OneMinusSrcAlpha),
            alpha: component(F::SrcAlpha, F::OneMinusSrcAlpha),
        }),
        BlendMode::Opaque => None,
    }
}

fn create_sampler(ctx: &RenderCtx<'_>, mode: SamplerMode) -> wgpu::Sampler {
    let (filter, address) = match mode {
        SamplerMode::LinearClamp => (wgpu::FilterMode::Linear, wgpu::AddressMode::ClampToEdge),
        SamplerMode::LinearWrap => (wgpu::FilterMode::Linear, wgpu::AddressMode::Repeat),
        SamplerMode::PointClamp => (wgpu::FilterMode::Nearest, wgpu::AddressMode::ClampToEdge),
        SamplerMode::PointWrap => (wgpu::FilterMode::Nearest, wgpu::AddressMode::Repeat),
    };
    ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("geobatch sampler"),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> [Vertex; 3] {
        [Vertex::default(); 3]
    }

    #[test]
    fn draws_record_pipeline_state_and_offsets() {
        let mut backend = WgpuBackend::new();
        backend.begin_frame(Viewport::new(100.0, 100.0));
        backend.apply_state(&RenderState::default(), &Mat4::IDENTITY);
        backend.bind_texture(TextureId(1));
        backend.draw_indexed_triangles(&tri(), &[0, 1, 2]);
        backend.draw_indexed_triangles(&tri(), &[0, 2, 1]);

        assert_eq!(backend.recorded_draws(), 2);
        let second = backend.ops[1];
        assert_eq!(second.base_vertex, 3);
        // Odd index count is padded to keep ranges aligned.
        assert_eq!(second.first_index, 4);
        assert_eq!(second.index_count, 3);
    }

    #[test]
    fn effect_pass_selects_effect_shader() {
        let mut backend = WgpuBackend::new();
        backend.apply_state(&RenderState::default(), &Mat4::IDENTITY);
        backend.bind_texture(TextureId(1));
        backend.apply_effect_pass(EffectId(3), 1);
        backend.draw_indexed_triangles(&tri(), &[0, 1, 2]);

        assert_eq!(backend.ops[0].pipeline.shader, ShaderKey::Effect(EffectId(3), 1));
    }

    #[test]
    fn unknown_effect_reports_disposed() {
        let backend = WgpuBackend::new();
        assert_eq!(backend.effect_pass_count(EffectId(1)), None);
    }

    #[test]
    fn draw_without_texture_is_ignored() {
        let mut backend = WgpuBackend::new();
        backend.apply_state(&RenderState::default(), &Mat4::IDENTITY);
        backend.draw_indexed_triangles(&tri(), &[0, 1, 2]);
        assert_eq!(backend.recorded_draws(), 0);
    }
}
