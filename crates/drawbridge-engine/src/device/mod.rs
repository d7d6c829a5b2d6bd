//! wgpu host backend.
//!
//! - [`Gpu`]: headless device/queue plus an offscreen color and depth target
//! - [`WgpuHost`]: [`PipelineHost`](crate::render::PipelineHost) that compiles
//!   entity pipelines, owns textures, and draws layer buffers and GUI frames

mod gpu;
mod gui;
mod host;
mod textures;
mod world;

pub use gpu::{Gpu, GpuFrame, GpuInit, DEPTH_FORMAT};
pub use gui::{scissor_for, GuiRenderer};
pub use host::WgpuHost;
pub use textures::{GpuTexture, TextureRegistry, WHITE_TEXTURE};
pub use world::WorldRenderer;
