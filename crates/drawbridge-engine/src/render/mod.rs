//! Pipeline and layer caches.
//!
//! Everything here turns a semantic request (shape, texture, cull, blend) into
//! a shared handle. Host objects are created lazily on first use of a key and
//! kept until [`Adapter::invalidate`](crate::adapter::Adapter::invalidate).
//!
//! Handles are `Rc`-based: the caches live on the render thread only.

mod blend;
mod host;
mod layer;
mod pipeline;
mod texture;

pub use blend::{BlendStrategy, SplitBlend, UnifiedBlend};
pub use host::PipelineHost;
pub use layer::{Layer, LayerCache, LayerHandle, LayerKey, OutlineMode, ShapeKind};
pub use pipeline::{
    BlendFunction, BlendMode, DrawMode, PipelineCache, PipelineDesc, PipelineHandle, PipelineId,
    PipelineKey, VertexFormat,
};
pub use texture::TextureId;
