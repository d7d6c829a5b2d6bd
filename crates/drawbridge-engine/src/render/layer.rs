use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::error::HostError;

use super::{BlendMode, BlendStrategy, DrawMode, PipelineCache, PipelineHandle, PipelineHost, TextureId};

/// Primitive family a layer accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Quads,
    Triangles,
}

impl ShapeKind {
    #[inline]
    pub const fn draw_mode(self) -> DrawMode {
        match self {
            ShapeKind::Quads => DrawMode::Quads,
            ShapeKind::Triangles => DrawMode::Triangles,
        }
    }

    #[inline]
    pub const fn vertices_per_primitive(self) -> usize {
        self.draw_mode().vertices_per_primitive()
    }
}

/// Participation in the host's entity outline pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OutlineMode {
    None,
    AffectsOutline,
    IsOutline,
}

/// Cache key for [`LayerCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerKey {
    pub shape: ShapeKind,
    pub texture: TextureId,
    pub cull: bool,
    pub blend: BlendMode,
}

impl LayerKey {
    pub fn new(shape: ShapeKind, texture: TextureId, cull: bool, blend: BlendMode) -> Self {
        Self { shape, texture, cull, blend }
    }
}

/// A pipeline bound to a texture plus buffering hints; the unit draw code
/// writes vertices into.
#[derive(Debug)]
pub struct Layer {
    pub key: LayerKey,
    pub name: &'static str,
    pub pipeline: PipelineHandle,
    pub texture: TextureId,
    pub expected_buffer_size: usize,
    pub outline: OutlineMode,
    /// Drawn after opaque layers, alpha-blended and without depth writes.
    pub translucent: bool,
}

impl Layer {
    fn name_for(shape: ShapeKind, blend: BlendMode) -> &'static str {
        match (shape, blend) {
            (ShapeKind::Quads, BlendMode::Opaque) => "drawbridge-quads-opaque",
            (ShapeKind::Quads, BlendMode::Translucent) => "drawbridge-quads-translucent",
            (ShapeKind::Triangles, BlendMode::Opaque) => "drawbridge-tris-opaque",
            (ShapeKind::Triangles, BlendMode::Translucent) => "drawbridge-tris-translucent",
        }
    }
}

/// Shared handle to a cached [`Layer`].
///
/// Two handles refer to the same layer iff [`LayerHandle::ptr_eq`].
#[derive(Clone)]
pub struct LayerHandle(Rc<Layer>);

impl LayerHandle {
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for LayerHandle {
    type Target = Layer;

    #[inline]
    fn deref(&self) -> &Layer {
        &self.0
    }
}

impl fmt::Debug for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerHandle")
            .field("name", &self.0.name)
            .field("texture", &self.0.texture)
            .field("cull", &self.0.key.cull)
            .field("pipeline", &self.0.pipeline.id())
            .finish()
    }
}

/// Memoized layer factory keyed by [`LayerKey`].
pub struct LayerCache {
    entries: HashMap<LayerKey, LayerHandle>,
    expected_buffer_size: usize,
    outline: OutlineMode,
}

impl LayerCache {
    pub fn new(expected_buffer_size: usize, outline: OutlineMode) -> Self {
        Self { entries: HashMap::new(), expected_buffer_size, outline }
    }

    /// Returns the cached layer for `key`, creating it (and its pipeline) on first use.
    pub fn get_or_create(
        &mut self,
        key: LayerKey,
        pipelines: &mut PipelineCache,
        strategy: &dyn BlendStrategy,
        host: &mut dyn PipelineHost,
    ) -> Result<LayerHandle, HostError> {
        if let Some(handle) = self.entries.get(&key) {
            return Ok(handle.clone());
        }

        let pipeline_key = strategy.pipeline_key(key.shape.draw_mode(), key.cull, key.blend);
        let pipeline = pipelines.get_or_create(pipeline_key, host)?;

        let layer = Layer {
            name: Layer::name_for(key.shape, key.blend),
            pipeline,
            texture: key.texture.clone(),
            expected_buffer_size: self.expected_buffer_size,
            outline: self.outline,
            translucent: strategy.translucent_setup(key.blend),
            key: key.clone(),
        };
        host.prepare_layer(&layer)?;
        log::debug!(
            "created layer {} for texture {} (cull: {}, pipeline: {:?})",
            layer.name,
            layer.texture,
            key.cull,
            layer.pipeline.id()
        );

        let handle = LayerHandle(Rc::new(layer));
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

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
