//! World-space (3D) vertex emission.
//!
//! Flow:
//! 1) [`Adapter::begin_quads`](crate::adapter::Adapter::begin_quads) /
//!    [`begin_triangles`](crate::adapter::Adapter::begin_triangles) resolve a layer
//! 2) the session is bound to a [`WorldDrawContext`] (pose + buffer source)
//! 3) each `next` transforms one semantic vertex and appends an [`EntityVertex`]
//!    to the layer's buffer
//! 4) ending, rebinding or dropping the session checks that only whole
//!    primitives were written

mod buffers;
mod emitter;
mod pose;
mod session;
mod transform;
mod vertex;

pub use buffers::{LayerBuffer, LayerBuffers};
pub use emitter::{BufferSource, VertexConsumer, VertexEmitter, WorldDrawContext};
pub use pose::{PoseEntry, PoseStack};
pub use session::{QuadSession, TriangleSession, VertexSession};
pub use transform::{IdentityTransform, VertexTransformer};
pub use vertex::{EntityVertex, PosTex, PosTexNorm, DEFAULT_OVERLAY, FULL_BRIGHT};
