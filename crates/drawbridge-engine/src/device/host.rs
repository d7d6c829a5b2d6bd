use anyhow::Result;

use crate::coords::Mat4;
use crate::error::HostError;
use crate::gui::{GuiFrame, WindowSize};
use crate::render::{Layer, PipelineDesc, PipelineHost, PipelineId, TextureId};
use crate::world::LayerBuffers;

use super::gui::GuiRenderer;
use super::textures::TextureRegistry;
use super::world::WorldRenderer;
use super::{Gpu, GpuFrame};

/// [`PipelineHost`] backed by real wgpu pipelines.
///
/// Owns the texture registry and the world/GUI renderers; layers referencing
/// textures that were never registered are rejected at creation.
pub struct WgpuHost {
    device: wgpu::Device,
    textures: TextureRegistry,
    world: WorldRenderer,
    gui: GuiRenderer,
}

impl WgpuHost {
    pub fn new(gpu: &Gpu) -> Self {
        let textures = TextureRegistry::new(gpu.device(), gpu.queue());
        let world = WorldRenderer::new(gpu.device(), gpu.color_format(), &textures);
        let gui = GuiRenderer::new(gpu.device(), gpu.color_format(), &textures);
        Self { device: gpu.device().clone(), textures, world, gui }
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn register_texture(&mut self, id: impl Into<TextureId>, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
        self.textures.register(id.into(), width, height, rgba)
    }

    pub fn register_checker(&mut self, id: impl Into<TextureId>, size: u32, a: [u8; 4], b: [u8; 4]) -> Result<()> {
        self.textures.register_checker(id.into(), size, a, b)
    }

    pub fn pipeline_count(&self) -> usize {
        self.world.pipeline_count()
    }

    /// Draws every filled layer buffer.
    pub fn draw_world(&mut self, gpu: &Gpu, frame: &mut GpuFrame, buffers: &LayerBuffers, view_proj: &Mat4) {
        self.world.draw(gpu, frame, &self.textures, buffers, view_proj);
    }

    /// Draws a flushed GUI frame over the world.
    pub fn draw_gui(&mut self, gpu: &Gpu, frame: &mut GpuFrame, gui: &GuiFrame, window: WindowSize) {
        self.gui.draw(gpu, frame, &self.textures, gui, window);
    }
}

impl PipelineHost for WgpuHost {
    fn register_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineId, HostError> {
        self.world
            .register(&self.device, desc)
            .inspect_err(|e| log::warn!("pipeline registration failed: {e}"))
    }

    fn prepare_layer(&mut self, layer: &Layer) -> Result<(), HostError> {
        if !self.textures.contains(&layer.texture) {
            log::warn!("layer {} references unregistered texture {}", layer.name, layer.texture);
            return Err(HostError::UnknownTexture(layer.texture.clone()));
        }
        Ok(())
    }
}
