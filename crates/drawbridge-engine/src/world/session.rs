use crate::coords::{Quad, Triangle};
use crate::render::{LayerHandle, ShapeKind};

use super::{PosTex, PosTexNorm, VertexEmitter, VertexTransformer, WorldDrawContext};

/// Capability handed to draw code by `begin_*` calls.
///
/// `set_context` must be called before the first `next`; it may be called
/// again to rebind to a new frame's buffers, but only between primitives.
/// Dropping a session mid-primitive panics.
pub trait VertexSession<'a> {
    type Vertex;

    fn set_context(&mut self, ctx: WorldDrawContext<'a>);

    /// Emits one vertex. Every 4 (quads) or 3 (triangles) calls form one primitive.
    fn next(&mut self, vertex: &Self::Vertex);
}

/// Returns the number of whole primitives written so far.
///
/// # Panics
/// Panics if the stream stopped mid-primitive.
fn finish(emitter: &VertexEmitter<'_>, shape: ShapeKind, at: &str) -> usize {
    let per = shape.vertices_per_primitive();
    let emitted = emitter.emitted();
    assert!(
        emitted % per == 0,
        "{} {} with {} vertices; expected a multiple of {}",
        emitter.layer().name,
        at,
        emitted,
        per
    );
    emitted / per
}

/// Drop-time check. Skipped while unwinding so the first panic is the one reported.
fn finish_on_drop(emitter: &VertexEmitter<'_>, shape: ShapeKind) {
    if !std::thread::panicking() {
        finish(emitter, shape, "dropped");
    }
}

/// Quad stream into a quads layer. Normals are always the up-vector.
pub struct QuadSession<'a> {
    emitter: VertexEmitter<'a>,
}

impl<'a> QuadSession<'a> {
    pub(crate) fn new(layer: LayerHandle, alpha: f32) -> Self {
        debug_assert_eq!(layer.key.shape, ShapeKind::Quads);
        Self { emitter: VertexEmitter::new(layer, alpha) }
    }

    /// Replaces the identity transformer applied to positions before the pose.
    pub fn with_transformer(mut self, transformer: impl VertexTransformer + 'a) -> Self {
        self.emitter.set_transformer(transformer);
        self
    }

    #[inline]
    pub fn layer(&self) -> &LayerHandle {
        self.emitter.layer()
    }

    #[inline]
    pub fn emitted(&self) -> usize {
        self.emitter.emitted()
    }

    pub fn quad(&mut self, quad: &Quad<PosTex>) {
        for v in quad.vertices() {
            self.next(v);
        }
    }

    /// Ends the session and returns the number of quads written.
    ///
    /// # Panics
    /// Panics if the last quad is incomplete.
    pub fn end(self) -> usize {
        finish(&self.emitter, ShapeKind::Quads, "ended")
    }
}

impl<'a> VertexSession<'a> for QuadSession<'a> {
    type Vertex = PosTex;

    fn set_context(&mut self, ctx: WorldDrawContext<'a>) {
        finish(&self.emitter, ShapeKind::Quads, "rebound");
        self.emitter.bind(ctx);
    }

    fn next(&mut self, vertex: &PosTex) {
        self.emitter.emit(vertex.pos, vertex.tex, None);
    }
}

impl Drop for QuadSession<'_> {
    fn drop(&mut self) {
        finish_on_drop(&self.emitter, ShapeKind::Quads);
    }
}

/// Triangle stream into a triangles layer.
///
/// With normals disabled every vertex gets the up-vector, which gives flat,
/// unlit-looking shading regardless of the supplied normals.
pub struct TriangleSession<'a> {
    emitter: VertexEmitter<'a>,
    enable_normals: bool,
}

impl<'a> TriangleSession<'a> {
    pub(crate) fn new(layer: LayerHandle, alpha: f32, enable_normals: bool) -> Self {
        debug_assert_eq!(layer.key.shape, ShapeKind::Triangles);
        Self { emitter: VertexEmitter::new(layer, alpha), enable_normals }
    }

    pub fn with_transformer(mut self, transformer: impl VertexTransformer + 'a) -> Self {
        self.emitter.set_transformer(transformer);
        self
    }

    #[inline]
    pub fn layer(&self) -> &LayerHandle {
        self.emitter.layer()
    }

    #[inline]
    pub fn normals_enabled(&self) -> bool {
        self.enable_normals
    }

    #[inline]
    pub fn emitted(&self) -> usize {
        self.emitter.emitted()
    }

    pub fn triangle(&mut self, triangle: &Triangle<PosTexNorm>) {
        for v in triangle.vertices() {
            self.next(v);
        }
    }

    /// Ends the session and returns the number of triangles written.
    ///
    /// # Panics
    /// Panics if the last triangle is incomplete.
    pub fn end(self) -> usize {
        finish(&self.emitter, ShapeKind::Triangles, "ended")
    }
}

impl<'a> VertexSession<'a> for TriangleSession<'a> {
    type Vertex = PosTexNorm;

    fn set_context(&mut self, ctx: WorldDrawContext<'a>) {
        finish(&self.emitter, ShapeKind::Triangles, "rebound");
        self.emitter.bind(ctx);
    }

    fn next(&mut self, vertex: &PosTexNorm) {
        let normal = self.enable_normals.then_some(vertex.normal);
        self.emitter.emit(vertex.pos, vertex.tex, normal);
    }
}

impl Drop for TriangleSession<'_> {
    fn drop(&mut self) {
        finish_on_drop(&self.emitter, ShapeKind::Triangles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Mat4, Vec2, Vec3};
    use crate::render::BlendMode;
    use crate::test_support::layer;
    use crate::world::{LayerBuffers, PoseStack, DEFAULT_OVERLAY, FULL_BRIGHT};

    fn unit_quad() -> Quad<PosTex> {
        Quad::new(
            PosTex::new(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0)),
            PosTex::new(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.0)),
            PosTex::new(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0)),
            PosTex::new(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0)),
        )
    }

    fn sideways_triangle() -> Triangle<PosTexNorm> {
        let n = Vec3::new(1.0, 0.0, 0.0);
        Triangle::new(
            PosTexNorm::new(Vec3::new(0.0, 0.0, 0.0), Vec2::zero(), n),
            PosTexNorm::new(Vec3::new(0.0, 1.0, 0.0), Vec2::zero(), n),
            PosTexNorm::new(Vec3::new(0.0, 0.0, 1.0), Vec2::zero(), n),
        )
    }

    #[test]
    fn four_calls_append_one_quad() {
        let l = layer(ShapeKind::Quads, "a", BlendMode::Opaque);
        let poses = PoseStack::new();
        let mut buffers = LayerBuffers::new();
        {
            let mut s = QuadSession::new(l.clone(), 1.0);
            s.set_context(WorldDrawContext::new(&poses, &mut buffers));
            s.quad(&unit_quad());
            assert_eq!(s.end(), 1);
        }
        let written = buffers.vertices(&l);
        assert_eq!(written.len(), 4);
        assert_eq!(written[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(written[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn vertex_attributes_are_fixed() {
        let l = layer(ShapeKind::Quads, "a", BlendMode::Translucent);
        let poses = PoseStack::new();
        let mut buffers = LayerBuffers::new();
        {
            let mut s = QuadSession::new(l.clone(), 0.5);
            s.set_context(WorldDrawContext::new(&poses, &mut buffers));
            s.quad(&unit_quad());
        }
        for v in buffers.vertices(&l) {
            assert_eq!(v.color, [1.0, 1.0, 1.0, 0.5]);
            assert_eq!(v.overlay, DEFAULT_OVERLAY);
            assert_eq!(v.light, FULL_BRIGHT);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn transformer_runs_before_pose() {
        let l = layer(ShapeKind::Quads, "a", BlendMode::Opaque);
        let mut poses = PoseStack::new();
        poses.translate(100.0, 0.0, 0.0);
        let mut buffers = LayerBuffers::new();
        {
            let double = |p: Vec3| p * 2.0;
            let mut s = QuadSession::new(l.clone(), 1.0).with_transformer(double);
            s.set_context(WorldDrawContext::new(&poses, &mut buffers));
            s.quad(&unit_quad());
        }
        assert_eq!(buffers.vertices(&l)[2].position, [102.0, 2.0, 0.0]);
    }

    #[test]
    fn bound_pose_is_a_snapshot() {
        let l = layer(ShapeKind::Quads, "a", BlendMode::Opaque);
        let mut poses = PoseStack::new();
        let mut buffers = LayerBuffers::new();
        let ctx = WorldDrawContext::new(&poses, &mut buffers);
        let mut s = QuadSession::new(l.clone(), 1.0);
        s.set_context(ctx);
        s.quad(&unit_quad());
        drop(s);
        poses.translate(5.0, 5.0, 5.0);
        assert_eq!(buffers.vertices(&l)[0].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn disabled_normals_use_up_vector() {
        let l = layer(ShapeKind::Triangles, "t", BlendMode::Opaque);
        let poses = PoseStack::new();
        let mut buffers = LayerBuffers::new();
        {
            let mut s = TriangleSession::new(l.clone(), 1.0, false);
            s.set_context(WorldDrawContext::new(&poses, &mut buffers));
            s.triangle(&sideways_triangle());
            assert_eq!(s.end(), 1);
        }
        let written = buffers.vertices(&l);
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn enabled_normals_are_transformed() {
        let l = layer(ShapeKind::Triangles, "t", BlendMode::Opaque);
        let poses = PoseStack::new();
        let mut buffers = LayerBuffers::new();
        {
            // Mirror x: the +x normal must come out as -x.
            let mirror = Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0));
            let mut s = TriangleSession::new(l.clone(), 1.0, true).with_transformer(mirror);
            s.set_context(WorldDrawContext::new(&poses, &mut buffers));
            s.triangle(&sideways_triangle());
        }
        for v in buffers.vertices(&l) {
            assert_eq!(v.normal, [-1.0, 0.0, 0.0]);
        }
    }

    #[test]
    #[should_panic(expected = "before set_context")]
    fn next_without_context_panics() {
        let mut s = QuadSession::new(layer(ShapeKind::Quads, "a", BlendMode::Opaque), 1.0);
        s.next(&unit_quad().v0);
    }

    #[test]
    #[should_panic(expected = "expected a multiple of 3")]
    fn partial_triangle_panics_on_end() {
        let l = layer(ShapeKind::Triangles, "t", BlendMode::Opaque);
        let poses = PoseStack::new();
        let mut buffers = LayerBuffers::new();
        let mut s = TriangleSession::new(l, 1.0, true);
        s.set_context(WorldDrawContext::new(&poses, &mut buffers));
        s.next(&sideways_triangle().v0);
        s.end();
    }

    #[test]
    #[should_panic(expected = "dropped with 3 vertices; expected a multiple of 4")]
    fn dropping_mid_quad_panics() {
        let l = layer(ShapeKind::Quads, "a", BlendMode::Opaque);
        let poses = PoseStack::new();
        let mut buffers = LayerBuffers::new();
        let mut s = QuadSession::new(l, 1.0);
        s.set_context(WorldDrawContext::new(&poses, &mut buffers));
        let q = unit_quad();
        s.next(&q.v0);
        s.next(&q.v1);
        s.next(&q.v2);
    }

    #[test]
    #[should_panic(expected = "rebound with 2 vertices; expected a multiple of 3")]
    fn rebinding_mid_triangle_panics() {
        let l = layer(ShapeKind::Triangles, "t", BlendMode::Opaque);
        let poses = PoseStack::new();
        let mut first = LayerBuffers::new();
        let mut second = LayerBuffers::new();
        let mut s = TriangleSession::new(l, 1.0, true);
        s.set_context(WorldDrawContext::new(&poses, &mut first));
        let t = sideways_triangle();
        s.next(&t.v0);
        s.next(&t.v1);
        s.set_context(WorldDrawContext::new(&poses, &mut second));
    }

    #[test]
    fn rebinding_between_quads_keeps_counting() {
        let l = layer(ShapeKind::Quads, "a", BlendMode::Opaque);
        let poses = PoseStack::new();
        let mut first = LayerBuffers::new();
        let mut second = LayerBuffers::new();
        {
            let mut s = QuadSession::new(l.clone(), 1.0);
            s.set_context(WorldDrawContext::new(&poses, &mut first));
            s.quad(&unit_quad());
            s.set_context(WorldDrawContext::new(&poses, &mut second));
            s.quad(&unit_quad());
            assert_eq!(s.end(), 2);
        }
        assert_eq!(first.vertices(&l).len(), 4);
        assert_eq!(second.vertices(&l).len(), 4);
    }
}
