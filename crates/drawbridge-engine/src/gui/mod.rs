//! Immediate-mode 2D drawing.
//!
//! Each draw command snapshots an immutable [`RenderState`] (current pose,
//! scissor top, geometry, color) and hands it to the host's collector. The
//! pixel clip itself is enforced by the host scissor, driven by
//! [`ScissorStack`].

mod batch;
mod context;
mod host;
mod render_state;
mod scissor;
mod sprites;

pub use batch::{GuiBatch, GuiDraw, GuiFrame};
pub use context::GuiDrawContext;
pub use host::{GuiHost, ScissorHost, WindowSize};
pub use render_state::{compute_bounds, GuiPipeline, GuiVertex, RenderState, ScreenVertex, TextureSetup};
pub use scissor::{ScissorFrame, ScissorStack};
pub use sprites::{checkbox_sprite, ButtonTextures, HoverState};
