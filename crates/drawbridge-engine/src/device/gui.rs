use bytemuck::{Pod, Zeroable};

use crate::coords::ClipRect;
use crate::gui::{GuiFrame, GuiVertex, TextureSetup, WindowSize};
use crate::render::TextureId;

use super::textures::{TextureRegistry, WHITE_TEXTURE};
use super::world::ensure_capacity;
use super::{Gpu, GpuFrame};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ScreenUniform {
    size: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

impl GuiVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // uv
        2 => Unorm8x4   // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<GuiVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Converts a screen-pixel clip to a wgpu scissor `(x, y, w, h)` clamped to the target.
///
/// `None` clip covers the whole target. Returns `None` when nothing is visible.
pub fn scissor_for(clip: Option<ClipRect>, scale: f32, target: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
    let (tw, th) = (target.0 as i32, target.1 as i32);
    let (x1, y1, x2, y2) = match clip {
        None => (0, 0, tw, th),
        Some(rect) => rect.to_device_edges(scale),
    };
    let (x1, y1) = (x1.clamp(0, tw), y1.clamp(0, th));
    let (x2, y2) = (x2.clamp(0, tw), y2.clamp(0, th));
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some((x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32))
}

/// Draws a flushed [`GuiFrame`] on top of the color target.
pub struct GuiRenderer {
    pipeline: wgpu::RenderPipeline,
    screen_ubo: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    white: TextureId,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,
}

impl GuiRenderer {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, textures: &TextureRegistry) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("drawbridge gui shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gui.wgsl").into()),
        });

        let screen_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("drawbridge gui screen bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(size_of::<ScreenUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("drawbridge gui pipeline layout"),
            bind_group_layouts: &[&screen_layout, textures.gui_layout()],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("drawbridge gui pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GuiVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let screen_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("drawbridge gui screen ubo"),
            size: size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("drawbridge gui screen bind group"),
            layout: &screen_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: screen_ubo.as_entire_binding() }],
        });

        Self {
            pipeline,
            screen_ubo,
            screen_bind_group,
            white: TextureId::new(WHITE_TEXTURE),
            vbo: None,
            vbo_capacity: 0,
            ibo: None,
            ibo_capacity: 0,
        }
    }

    pub fn draw(
        &mut self,
        gpu: &Gpu,
        frame: &mut GpuFrame,
        textures: &TextureRegistry,
        gui: &GuiFrame,
        window: WindowSize,
    ) {
        if gui.draws.is_empty() || window.is_degenerate() {
            return;
        }

        let quads = gui.quad_count() as u32;
        let indices: Vec<u32> = (0..quads)
            .flat_map(|q| [0, 1, 2, 0, 2, 3].map(|i| q * 4 + i))
            .collect();

        let uniform = ScreenUniform {
            size: [window.scaled_width as f32, window.scaled_height as f32],
            _pad: [0.0; 2],
        };
        gpu.queue().write_buffer(&self.screen_ubo, 0, bytemuck::bytes_of(&uniform));

        ensure_capacity(
            gpu.device(),
            &mut self.vbo,
            &mut self.vbo_capacity,
            gui.vertices.len(),
            size_of::<GuiVertex>(),
            wgpu::BufferUsages::VERTEX,
            "drawbridge gui vbo",
        );
        ensure_capacity(
            gpu.device(),
            &mut self.ibo,
            &mut self.ibo_capacity,
            indices.len(),
            size_of::<u32>(),
            wgpu::BufferUsages::INDEX,
            "drawbridge gui ibo",
        );
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };
        gpu.queue().write_buffer(vbo, 0, bytemuck::cast_slice(&gui.vertices));
        gpu.queue().write_buffer(ibo, 0, bytemuck::cast_slice(&indices));

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("drawbridge gui pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: gpu.color_view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.screen_bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

        for draw in &gui.draws {
            let id = match &draw.texture {
                TextureSetup::Empty => &self.white,
                TextureSetup::Single(id) => id,
            };
            let Some(texture) = textures.get(id) else {
                log::warn!("gui draw skipped: texture {id} is not registered");
                continue;
            };
            let Some((sx, sy, sw, sh)) = scissor_for(draw.scissor, window.scale_factor, gpu.size()) else {
                continue;
            };

            // 4 vertices per quad -> 6 indices.
            let first = draw.vertices.start / 4 * 6;
            let last = draw.vertices.end / 4 * 6;
            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.set_bind_group(1, &texture.gui_bind_group, &[]);
            rpass.draw_indexed(first..last, 0, 0..1);
        }
    }
}
