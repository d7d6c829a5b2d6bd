use crate::coords::{Vec2, Vec3};
use crate::render::LayerHandle;

use super::{EntityVertex, PoseEntry, PoseStack, VertexTransformer, DEFAULT_OVERLAY, FULL_BRIGHT};

/// Host vertex sink for one layer.
pub trait VertexConsumer {
    fn vertex(&mut self, vertex: EntityVertex);
}

impl VertexConsumer for Vec<EntityVertex> {
    #[inline]
    fn vertex(&mut self, vertex: EntityVertex) {
        self.push(vertex);
    }
}

/// Per-frame provider of vertex sinks, keyed by layer.
///
/// Repeated calls for the same layer must return the same underlying buffer.
pub trait BufferSource {
    fn buffer(&mut self, layer: &LayerHandle) -> &mut dyn VertexConsumer;
}

/// Binding passed to [`VertexSession::set_context`](super::VertexSession::set_context).
///
/// Captures the current pose by value; later changes to the pose stack do not
/// affect an already bound session.
pub struct WorldDrawContext<'a> {
    pose: PoseEntry,
    buffers: &'a mut dyn BufferSource,
}

impl<'a> WorldDrawContext<'a> {
    pub fn new(poses: &PoseStack, buffers: &'a mut dyn BufferSource) -> Self {
        Self { pose: *poses.peek(), buffers }
    }

    #[inline]
    pub fn pose(&self) -> &PoseEntry {
        &self.pose
    }
}

struct Bound<'a> {
    pose: PoseEntry,
    sink: &'a mut dyn VertexConsumer,
}

/// Shared emission state behind both session kinds.
///
/// Writes `(1, 1, 1, alpha)` color, the default overlay and full-bright light
/// for every vertex.
pub struct VertexEmitter<'a> {
    layer: LayerHandle,
    alpha: f32,
    transformer: Box<dyn VertexTransformer + 'a>,
    bound: Option<Bound<'a>>,
    emitted: usize,
}

impl<'a> VertexEmitter<'a> {
    pub fn new(layer: LayerHandle, alpha: f32) -> Self {
        Self {
            layer,
            alpha,
            transformer: Box::new(super::IdentityTransform),
            bound: None,
            emitted: 0,
        }
    }

    pub fn set_transformer(&mut self, transformer: impl VertexTransformer + 'a) {
        self.transformer = Box::new(transformer);
    }

    #[inline]
    pub fn layer(&self) -> &LayerHandle {
        &self.layer
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    #[inline]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Binds the pose and this layer's buffer from `ctx`.
    pub fn bind(&mut self, ctx: WorldDrawContext<'a>) {
        let WorldDrawContext { pose, buffers } = ctx;
        let sink = buffers.buffer(&self.layer);
        self.bound = Some(Bound { pose, sink });
    }

    /// Transforms and appends one vertex.
    ///
    /// `normal` of `None` substitutes [`Vec3::UP`] for the vertex normal. The
    /// substitute skips the transformer but still goes through the pose.
    ///
    /// # Panics
    /// Panics if no context has been bound.
    pub fn emit(&mut self, pos: Vec3, tex: Vec2, normal: Option<Vec3>) {
        let Some(bound) = self.bound.as_mut() else {
            panic!("vertex emitted on layer {} before set_context", self.layer.name);
        };

        let world = self.transformer.transform(pos);
        let normal = match normal {
            Some(n) => self.transformer.transform_normal(pos, n),
            None => Vec3::UP,
        };
        let normal = bound.pose.transform_normal(normal);

        bound.sink.vertex(EntityVertex {
            position: bound.pose.transform_point(world).to_array(),
            color: [1.0, 1.0, 1.0, self.alpha],
            uv: tex.to_array(),
            overlay: DEFAULT_OVERLAY,
            light: FULL_BRIGHT,
            normal: normal.to_array(),
        });
        self.emitted += 1;
    }
}
