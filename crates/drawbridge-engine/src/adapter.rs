//! Process-wide adapter context.
//!
//! Owns the pipeline and layer caches plus the configured blend strategy, and
//! hands out vertex sessions. Construct one at startup and keep it on the
//! render thread for the lifetime of the process.

use crate::config::AdapterConfig;
use crate::error::HostError;
use crate::render::{
    BlendMode, BlendStrategy, LayerCache, LayerHandle, LayerKey, PipelineCache, PipelineHost, ShapeKind, TextureId,
};
use crate::world::{QuadSession, TriangleSession};

/// Snapshot of cache sizes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub pipelines: usize,
    pub layers: usize,
}

pub struct Adapter {
    config: AdapterConfig,
    strategy: Box<dyn BlendStrategy>,
    pipelines: PipelineCache,
    layers: LayerCache,
}

impl Adapter {
    pub fn new(config: AdapterConfig) -> Self {
        log::info!(
            "drawbridge adapter: blend policy {}, buffer hint {} bytes, outline {:?}",
            config.blend_policy,
            config.expected_buffer_size,
            config.outline
        );
        Self {
            strategy: config.blend_policy.strategy(),
            pipelines: PipelineCache::new(),
            layers: LayerCache::new(config.expected_buffer_size, config.outline),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Resolves (and creates on first use) the layer for the given parameters.
    pub fn layer(
        &mut self,
        host: &mut dyn PipelineHost,
        shape: ShapeKind,
        texture: &TextureId,
        cull: bool,
        blend: BlendMode,
    ) -> Result<LayerHandle, HostError> {
        let key = LayerKey::new(shape, texture.clone(), cull, blend);
        self.layers
            .get_or_create(key, &mut self.pipelines, self.strategy.as_ref(), host)
            .inspect_err(|e| log::warn!("layer creation failed: {e}"))
    }

    /// Starts a quad stream into the layer for `texture`.
    ///
    /// Alpha below 1 routes the quads to a translucent layer.
    pub fn begin_quads<'a>(
        &mut self,
        host: &mut dyn PipelineHost,
        texture: &TextureId,
        alpha: f32,
        cull: bool,
    ) -> Result<QuadSession<'a>, HostError> {
        let layer = self.layer(host, ShapeKind::Quads, texture, cull, BlendMode::for_alpha(alpha))?;
        Ok(QuadSession::new(layer, alpha))
    }

    /// Starts a triangle stream into the layer for `texture`.
    pub fn begin_triangles<'a>(
        &mut self,
        host: &mut dyn PipelineHost,
        texture: &TextureId,
        alpha: f32,
        enable_normals: bool,
        cull: bool,
    ) -> Result<TriangleSession<'a>, HostError> {
        let layer = self.layer(host, ShapeKind::Triangles, texture, cull, BlendMode::for_alpha(alpha))?;
        Ok(TriangleSession::new(layer, alpha, enable_normals))
    }

    /// Drops every cached layer and pipeline.
    ///
    /// Call after the host reloads its resources; handles obtained earlier keep
    /// working but are no longer shared with new lookups.
    pub fn invalidate(&mut self) {
        log::debug!("invalidating caches ({:?})", self.stats());
        self.layers.clear();
        self.pipelines.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { pipelines: self.pipelines.len(), layers: self.layers.len() }
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new(AdapterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlendPolicy;
    use crate::coords::{Quad, Vec2, Vec3};
    use crate::test_support::RecordingHost;
    use crate::world::{LayerBuffers, PosTex, PoseStack, VertexSession, WorldDrawContext};

    fn tex(name: &str) -> TextureId {
        TextureId::new(name)
    }

    #[test]
    fn same_texture_resolves_same_layer() {
        let mut adapter = Adapter::default();
        let mut host = RecordingHost::default();

        let a = adapter.begin_quads(&mut host, &tex("textureA"), 0.5, true).unwrap();
        let b = adapter.begin_quads(&mut host, &tex("textureA"), 0.5, true).unwrap();
        assert!(LayerHandle::ptr_eq(a.layer(), b.layer()));

        let c = adapter.begin_quads(&mut host, &tex("textureB"), 0.5, true).unwrap();
        assert!(!LayerHandle::ptr_eq(a.layer(), c.layer()));
        assert_eq!(adapter.stats(), CacheStats { pipelines: 1, layers: 2 });
    }

    #[test]
    fn alpha_picks_blend_mode() {
        let mut adapter = Adapter::default();
        let mut host = RecordingHost::default();

        let solid = adapter.begin_triangles(&mut host, &tex("t"), 1.0, true, false).unwrap();
        let faded = adapter.begin_triangles(&mut host, &tex("t"), 0.25, true, false).unwrap();

        assert_eq!(solid.layer().key.blend, BlendMode::Opaque);
        assert_eq!(faded.layer().key.blend, BlendMode::Translucent);
        assert_eq!(faded.layer().name, "drawbridge-tris-translucent");
        assert_eq!(adapter.stats().pipelines, 2);
    }

    #[test]
    fn unified_policy_registers_one_pipeline_per_mode() {
        let mut adapter = Adapter::new(AdapterConfig::default().with_blend_policy(BlendPolicy::Unified));
        let mut host = RecordingHost::default();

        adapter.begin_quads(&mut host, &tex("t"), 1.0, true).unwrap();
        adapter.begin_quads(&mut host, &tex("t"), 0.5, true).unwrap();

        assert_eq!(host.pipelines.len(), 1);
        assert_eq!(host.pipelines[0].location, "pipeline/entity_translucent");
    }

    #[test]
    fn invalidate_clears_caches() {
        let mut adapter = Adapter::default();
        let mut host = RecordingHost::default();

        let before = adapter.begin_quads(&mut host, &tex("t"), 1.0, true).unwrap();
        adapter.invalidate();
        assert_eq!(adapter.stats(), CacheStats::default());

        let after = adapter.begin_quads(&mut host, &tex("t"), 1.0, true).unwrap();
        assert!(!LayerHandle::ptr_eq(before.layer(), after.layer()));
        assert_eq!(host.pipelines.len(), 2);
    }

    #[test]
    fn host_errors_propagate() {
        let mut adapter = Adapter::default();
        let mut host = RecordingHost { reject_pipelines: true, ..Default::default() };

        assert!(adapter.begin_quads(&mut host, &tex("t"), 1.0, true).is_err());
        assert_eq!(adapter.stats(), CacheStats::default());
    }

    #[test]
    fn session_writes_into_layer_buffer() {
        let mut adapter = Adapter::default();
        let mut host = RecordingHost::default();
        let mut buffers = LayerBuffers::new();
        let pose = PoseStack::new();

        let quad = Quad::new(
            PosTex::new(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0)),
            PosTex::new(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0)),
            PosTex::new(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0)),
            PosTex::new(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.0)),
        );

        let layer = {
            let mut session = adapter.begin_quads(&mut host, &tex("t"), 1.0, true).unwrap();
            session.set_context(WorldDrawContext::new(&pose, &mut buffers));
            session.quad(&quad);
            let layer = session.layer().clone();
            assert_eq!(session.end(), 1);
            layer
        };
        assert_eq!(buffers.vertex_count(), 4);
        assert_eq!(buffers.vertices(&layer).len(), 4);
    }
}
