use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::HostError;
use crate::world::EntityVertex;

use super::PipelineHost;

/// Primitive topology of a pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Quads,
    Triangles,
}

impl DrawMode {
    #[inline]
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            DrawMode::Quads => 4,
            DrawMode::Triangles => 3,
        }
    }
}

/// Opaque or alpha-blended rasterization.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    Opaque,
    Translucent,
}

impl BlendMode {
    /// Blend mode implied by a session-wide vertex alpha.
    #[inline]
    pub fn for_alpha(alpha: f32) -> Self {
        if alpha >= 1.0 { BlendMode::Opaque } else { BlendMode::Translucent }
    }
}

/// Host blend function attached to translucent pipelines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlendFunction {
    /// `src * src_alpha + dst * (1 - src_alpha)`, alpha channel additive.
    Translucent,
}

/// Vertex layouts the adapter can emit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Position, color, uv, overlay, light, normal. See [`EntityVertex`].
    PositionColorTextureOverlayLightNormal,
}

impl VertexFormat {
    #[inline]
    pub const fn stride(self) -> usize {
        match self {
            VertexFormat::PositionColorTextureOverlayLightNormal => size_of::<EntityVertex>(),
        }
    }
}

/// Cache key for [`PipelineCache`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub draw_mode: DrawMode,
    pub cull: bool,
    pub blend: BlendMode,
}

impl PipelineKey {
    #[inline]
    pub const fn new(draw_mode: DrawMode, cull: bool, blend: BlendMode) -> Self {
        Self { draw_mode, cull, blend }
    }
}

/// Everything a host needs to register one entity pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDesc {
    pub key: PipelineKey,
    pub location: &'static str,
    pub vertex_format: VertexFormat,
    pub draw_mode: DrawMode,
    /// Sampler names in binding order: the layer texture, then the lightmap.
    pub samplers: &'static [&'static str],
    pub blend: Option<BlendFunction>,
    pub cull: bool,
}

impl PipelineDesc {
    pub const SAMPLERS: &'static [&'static str] = &["Sampler0", "Sampler2"];

    /// Entity-style pipeline for `key`.
    ///
    /// Vertex layout and sampler bindings are identical for every key; only
    /// blend and cull wiring vary.
    pub fn entity(key: PipelineKey) -> Self {
        let (location, blend) = match key.blend {
            BlendMode::Opaque => ("pipeline/entity_opaque", None),
            BlendMode::Translucent => ("pipeline/entity_translucent", Some(BlendFunction::Translucent)),
        };
        Self {
            key,
            location,
            vertex_format: VertexFormat::PositionColorTextureOverlayLightNormal,
            draw_mode: key.draw_mode,
            samplers: Self::SAMPLERS,
            blend,
            cull: key.cull,
        }
    }
}

/// Host-assigned pipeline identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId(pub u32);

struct PipelineEntry {
    id: PipelineId,
    desc: PipelineDesc,
}

/// Shared handle to a registered pipeline. Never mutated after creation.
///
/// Two handles refer to the same pipeline iff [`PipelineHandle::ptr_eq`].
#[derive(Clone)]
pub struct PipelineHandle(Rc<PipelineEntry>);

impl PipelineHandle {
    #[inline]
    pub fn id(&self) -> PipelineId {
        self.0.id
    }

    #[inline]
    pub fn key(&self) -> PipelineKey {
        self.0.desc.key
    }

    #[inline]
    pub fn desc(&self) -> &PipelineDesc {
        &self.0.desc
    }

    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("id", &self.0.id)
            .field("location", &self.0.desc.location)
            .field("key", &self.0.desc.key)
            .finish()
    }
}

/// Memoized pipeline factory keyed by [`PipelineKey`].
#[derive(Default)]
pub struct PipelineCache {
    entries: HashMap<PipelineKey, PipelineHandle>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached handle for `key`, registering it with `host` on first use.
    ///
    /// Host failures are returned unchanged and leave the cache untouched.
    pub fn get_or_create(
        &mut self,
        key: PipelineKey,
        host: &mut dyn PipelineHost,
    ) -> Result<PipelineHandle, HostError> {
        if let Some(handle) = self.entries.get(&key) {
            return Ok(handle.clone());
        }

        let desc = PipelineDesc::entity(key);
        let id = host.register_pipeline(&desc)?;
        log::debug!("registered pipeline {} as {:?} for {:?}", desc.location, id, key);

        let handle = PipelineHandle(Rc::new(PipelineEntry { id, desc }));
        self.entries.insert(key, handle.clone());
        Ok(handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached handle. Outstanding clones stay valid but are no
    /// longer returned by lookups.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingHost;

    const OPAQUE_QUADS: PipelineKey = PipelineKey::new(DrawMode::Quads, true, BlendMode::Opaque);

    #[test]
    fn equal_keys_share_one_handle() {
        let mut host = RecordingHost::default();
        let mut cache = PipelineCache::new();

        let a = cache.get_or_create(OPAQUE_QUADS, &mut host).unwrap();
        let b = cache.get_or_create(OPAQUE_QUADS, &mut host).unwrap();

        assert!(PipelineHandle::ptr_eq(&a, &b));
        assert_eq!(host.pipelines.len(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_handles() {
        let mut host = RecordingHost::default();
        let mut cache = PipelineCache::new();

        let keys = [
            OPAQUE_QUADS,
            PipelineKey::new(DrawMode::Quads, false, BlendMode::Opaque),
            PipelineKey::new(DrawMode::Triangles, true, BlendMode::Opaque),
            PipelineKey::new(DrawMode::Quads, true, BlendMode::Translucent),
        ];
        let handles: Vec<_> = keys
            .iter()
            .map(|&k| cache.get_or_create(k, &mut host).unwrap())
            .collect();

        for (i, a) in handles.iter().enumerate() {
            for b in &handles[i + 1..] {
                assert!(!PipelineHandle::ptr_eq(a, b));
                assert_ne!(a.id(), b.id());
            }
        }
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn host_failure_propagates_and_is_not_cached() {
        let mut host = RecordingHost { reject_pipelines: true, ..Default::default() };
        let mut cache = PipelineCache::new();

        let err = cache.get_or_create(OPAQUE_QUADS, &mut host).unwrap_err();
        assert!(matches!(err, HostError::PipelineRejected { .. }));
        assert!(cache.is_empty());

        host.reject_pipelines = false;
        assert!(cache.get_or_create(OPAQUE_QUADS, &mut host).is_ok());
        assert_eq!(host.pipelines.len(), 1);
    }

    #[test]
    fn entity_desc_shares_layout_and_samplers() {
        let opaque = PipelineDesc::entity(OPAQUE_QUADS);
        let translucent =
            PipelineDesc::entity(PipelineKey::new(DrawMode::Triangles, false, BlendMode::Translucent));

        assert_eq!(opaque.vertex_format, translucent.vertex_format);
        assert_eq!(opaque.samplers, translucent.samplers);
        assert_eq!(opaque.location, "pipeline/entity_opaque");
        assert_eq!(translucent.location, "pipeline/entity_translucent");
        assert_eq!(opaque.blend, None);
        assert_eq!(translucent.blend, Some(BlendFunction::Translucent));
        assert!(!translucent.cull);
    }

    #[test]
    fn blend_mode_from_alpha() {
        assert_eq!(BlendMode::for_alpha(1.0), BlendMode::Opaque);
        assert_eq!(BlendMode::for_alpha(0.5), BlendMode::Translucent);
    }

    #[test]
    fn clear_forces_re_registration() {
        let mut host = RecordingHost::default();
        let mut cache = PipelineCache::new();
        let a = cache.get_or_create(OPAQUE_QUADS, &mut host).unwrap();
        cache.clear();
        let b = cache.get_or_create(OPAQUE_QUADS, &mut host).unwrap();
        assert!(!PipelineHandle::ptr_eq(&a, &b));
        assert_eq!(host.pipelines.len(), 2);
    }
}
