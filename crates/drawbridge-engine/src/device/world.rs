use bytemuck::{Pod, Zeroable};

use crate::coords::Mat4;
use crate::error::HostError;
use crate::render::{BlendFunction, DrawMode, PipelineDesc, PipelineId, ShapeKind, VertexFormat};
use crate::world::{EntityVertex, LayerBuffers};

use super::gpu::DEPTH_FORMAT;
use super::textures::TextureRegistry;
use super::{Gpu, GpuFrame};

/// Quad corner order expanded into two triangles.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl EntityVertex {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32x2, // uv
        3 => Uint32,    // overlay
        4 => Uint32,    // light
        5 => Float32x3  // normal
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: VertexFormat::PositionColorTextureOverlayLightNormal.stride() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

fn blend_state(blend: Option<BlendFunction>) -> Option<wgpu::BlendState> {
    match blend {
        None => None,
        Some(BlendFunction::Translucent) => Some(wgpu::BlendState {
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
        }),
    }
}

/// Fixed-function state one pipeline variant is built with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct RasterState {
    blend: Option<BlendFunction>,
    depth_write: bool,
}

/// State for a layer drawn through a pipeline described with `desc_blend`.
///
/// The layer's translucent flag wins over the description: under the unified
/// policy every description blends, and opaque layers must still write depth.
fn raster_state(desc_blend: Option<BlendFunction>, translucent: bool) -> RasterState {
    if translucent {
        RasterState { blend: Some(desc_blend.unwrap_or(BlendFunction::Translucent)), depth_write: false }
    } else {
        RasterState { blend: None, depth_write: true }
    }
}

/// Lazily built opaque and translucent pipelines for one [`PipelineId`].
struct PipelineVariants {
    desc: PipelineDesc,
    opaque: Option<wgpu::RenderPipeline>,
    translucent: Option<wgpu::RenderPipeline>,
}

impl PipelineVariants {
    fn get(&self, translucent: bool) -> Option<&wgpu::RenderPipeline> {
        if translucent { self.translucent.as_ref() } else { self.opaque.as_ref() }
    }

    fn slot(&mut self, translucent: bool) -> &mut Option<wgpu::RenderPipeline> {
        if translucent { &mut self.translucent } else { &mut self.opaque }
    }
}

/// Compiles entity pipelines on demand and draws [`LayerBuffers`].
pub struct WorldRenderer {
    color_format: wgpu::TextureFormat,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    camera_bind_group: wgpu::BindGroup,
    camera_ubo: wgpu::Buffer,

    /// Indexed by [`PipelineId`].
    pipelines: Vec<PipelineVariants>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,
}

impl WorldRenderer {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, textures: &TextureRegistry) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("drawbridge entity shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/entity.wgsl").into()),
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("drawbridge camera bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(size_of::<CameraUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("drawbridge entity pipeline layout"),
            bind_group_layouts: &[&camera_layout, textures.world_layout()],
            immediate_size: 0,
        });

        let camera_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("drawbridge camera ubo"),
            size: size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("drawbridge camera bind group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: camera_ubo.as_entire_binding() }],
        });

        Self {
            color_format,
            shader,
            pipeline_layout,
            camera_bind_group,
            camera_ubo,
            pipelines: Vec::new(),
            vbo: None,
            vbo_capacity: 0,
            ibo: None,
            ibo_capacity: 0,
        }
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Validates `desc` and builds the variant its blend function implies.
    ///
    /// The entity shader binds exactly the texture and lightmap samplers; any
    /// other sampler list is rejected. The other variant is built the first
    /// time a layer with the opposite translucent flag draws through it.
    pub fn register(&mut self, device: &wgpu::Device, desc: &PipelineDesc) -> Result<PipelineId, HostError> {
        if desc.samplers != PipelineDesc::SAMPLERS {
            return Err(HostError::PipelineRejected {
                location: desc.location,
                key: desc.key,
                reason: format!("entity shader binds {:?}, got {:?}", PipelineDesc::SAMPLERS, desc.samplers),
            });
        }

        let translucent = desc.blend.is_some();
        let mut variants = PipelineVariants { desc: desc.clone(), opaque: None, translucent: None };
        *variants.slot(translucent) = Some(self.build(device, desc, raster_state(desc.blend, translucent)));

        let id = PipelineId(self.pipelines.len() as u32);
        self.pipelines.push(variants);
        Ok(id)
    }

    fn ensure_variant(&mut self, device: &wgpu::Device, id: PipelineId, translucent: bool) {
        let Some(variants) = self.pipelines.get(id.0 as usize) else { return };
        if variants.get(translucent).is_some() {
            return;
        }
        let pipeline = self.build(device, &variants.desc, raster_state(variants.desc.blend, translucent));
        log::debug!(
            "built {} variant of {}",
            if translucent { "translucent" } else { "opaque" },
            variants.desc.location
        );
        if let Some(variants) = self.pipelines.get_mut(id.0 as usize) {
            *variants.slot(translucent) = Some(pipeline);
        }
    }

    fn build(&self, device: &wgpu::Device, desc: &PipelineDesc, state: RasterState) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.location),
            layout: Some(&self.pipeline_layout),

            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[EntityVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: blend_state(state.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Quads are expanded to triangle lists through the index buffer.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull.then_some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: state.depth_write,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    /// Uploads every non-empty layer buffer and draws it, opaque layers first.
    ///
    /// Each layer draws through the variant matching its translucent flag.
    pub fn draw(
        &mut self,
        gpu: &Gpu,
        frame: &mut GpuFrame,
        textures: &TextureRegistry,
        buffers: &LayerBuffers,
        view_proj: &Mat4,
    ) {
        for buffer in buffers.in_draw_order() {
            self.ensure_variant(gpu.device(), buffer.layer.pipeline.id(), buffer.layer.translucent);
        }

        let mut vertices: Vec<EntityVertex> = Vec::with_capacity(buffers.vertex_count());
        let mut indices: Vec<u32> = Vec::new();
        let mut draws = Vec::new();

        for buffer in buffers.in_draw_order() {
            let layer = &buffer.layer;
            let Some(texture) = textures.get(&layer.texture) else {
                log::warn!("skipping layer {} with unregistered texture {}", layer.name, layer.texture);
                continue;
            };
            let variants = self.pipelines.get(layer.pipeline.id().0 as usize);
            let Some(pipeline) = variants.and_then(|v| v.get(layer.translucent)) else {
                log::warn!("skipping layer {}: pipeline {:?} not built here", layer.name, layer.pipeline.id());
                continue;
            };

            let base = vertices.len() as u32;
            let first_index = indices.len() as u32;
            match layer.key.shape {
                ShapeKind::Quads => {
                    for quad in 0..buffer.primitive_count() as u32 {
                        indices.extend(QUAD_INDICES.iter().map(|i| base + quad * 4 + i));
                    }
                }
                ShapeKind::Triangles => {
                    let count = (buffer.primitive_count() * DrawMode::Triangles.vertices_per_primitive()) as u32;
                    indices.extend(base..base + count);
                }
            }
            vertices.extend_from_slice(&buffer.vertices);
            draws.push((pipeline, &texture.world_bind_group, first_index..indices.len() as u32));
        }

        if draws.is_empty() {
            return;
        }

        gpu.queue().write_buffer(
            &self.camera_ubo,
            0,
            bytemuck::bytes_of(&CameraUniform { view_proj: view_proj.cols }),
        );
        ensure_capacity(
            gpu.device(),
            &mut self.vbo,
            &mut self.vbo_capacity,
            vertices.len(),
            size_of::<EntityVertex>(),
            wgpu::BufferUsages::VERTEX,
            "drawbridge entity vbo",
        );
        ensure_capacity(
            gpu.device(),
            &mut self.ibo,
            &mut self.ibo_capacity,
            indices.len(),
            size_of::<u32>(),
            wgpu::BufferUsages::INDEX,
            "drawbridge entity ibo",
        );
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };
        gpu.queue().write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));
        gpu.queue().write_buffer(ibo, 0, bytemuck::cast_slice(&indices));

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("drawbridge world pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: gpu.color_view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: gpu.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, &self.camera_bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        for (pipeline, bind_group, range) in draws {
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(1, bind_group, &[]);
            rpass.draw_indexed(range, 0, 0..1);
        }
    }
}

/// Grows `slot` to hold `required` elements (power-of-two capacity, at least 256).
pub(super) fn ensure_capacity(
    device: &wgpu::Device,
    slot: &mut Option<wgpu::Buffer>,
    capacity: &mut usize,
    required: usize,
    stride: usize,
    usage: wgpu::BufferUsages,
    label: &str,
) {
    if required <= *capacity && slot.is_some() {
        return;
    }
    let new_cap = required.next_power_of_two().max(256);
    *slot = Some(device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (new_cap * stride) as u64,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
    *capacity = new_cap;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_layer_on_blended_pipeline_writes_depth() {
        // Unified policy: the description blends, the layer is opaque.
        let state = raster_state(Some(BlendFunction::Translucent), false);
        assert_eq!(state, RasterState { blend: None, depth_write: true });
        assert_eq!(blend_state(state.blend), None);
    }

    #[test]
    fn translucent_layer_blends_without_depth_writes() {
        for desc_blend in [None, Some(BlendFunction::Translucent)] {
            let state = raster_state(desc_blend, true);
            assert_eq!(state.blend, Some(BlendFunction::Translucent));
            assert!(!state.depth_write);
            assert!(blend_state(state.blend).is_some());
        }
    }
}
