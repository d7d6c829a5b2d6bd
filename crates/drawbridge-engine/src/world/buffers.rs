use std::collections::HashMap;

use crate::render::{LayerHandle, LayerKey};

use super::{BufferSource, EntityVertex, VertexConsumer};

/// Vertices recorded for one layer during a frame.
pub struct LayerBuffer {
    pub layer: LayerHandle,
    pub vertices: Vec<EntityVertex>,
}

impl LayerBuffer {
    fn new(layer: LayerHandle) -> Self {
        let capacity = layer.expected_buffer_size / size_of::<EntityVertex>();
        Self { layer, vertices: Vec::with_capacity(capacity) }
    }

    /// Complete primitives recorded so far.
    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.vertices.len() / self.layer.key.shape.vertices_per_primitive()
    }
}

/// CPU-side [`BufferSource`]: one growable vertex buffer per layer.
///
/// Performance characteristics:
/// - buffer lookup is one hash of the layer key
/// - [`clear`](Self::clear) keeps per-layer allocations for the next frame
#[derive(Default)]
pub struct LayerBuffers {
    buffers: Vec<LayerBuffer>,
    index: HashMap<LayerKey, usize>,
}

impl LayerBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded vertices for `layer` (empty if the layer was never bound).
    pub fn vertices(&self, layer: &LayerHandle) -> &[EntityVertex] {
        self.index
            .get(&layer.key)
            .map_or(&[][..], |&i| self.buffers[i].vertices.as_slice())
    }

    /// Total vertices across all layers.
    pub fn vertex_count(&self) -> usize {
        self.buffers.iter().map(|b| b.vertices.len()).sum()
    }

    /// Non-empty buffers in draw order: layers without the translucent setup
    /// flag first, then translucent ones, each group in first-use order.
    pub fn in_draw_order(&self) -> impl Iterator<Item = &LayerBuffer> {
        let opaque = self.buffers.iter().filter(|b| !b.layer.translucent);
        let translucent = self.buffers.iter().filter(|b| b.layer.translucent);
        opaque.chain(translucent).filter(|b| !b.vertices.is_empty())
    }

    /// Clears recorded vertices. Keeps layers and capacity for reuse.
    pub fn clear(&mut self) {
        for b in &mut self.buffers {
            b.vertices.clear();
        }
    }

    /// Forgets every layer, e.g. after the layer cache was invalidated.
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.index.clear();
    }
}

impl BufferSource for LayerBuffers {
    fn buffer(&mut self, layer: &LayerHandle) -> &mut dyn VertexConsumer {
        let i = match self.index.get(&layer.key) {
            Some(&i) => i,
            None => {
                self.buffers.push(LayerBuffer::new(layer.clone()));
                let i = self.buffers.len() - 1;
                self.index.insert(layer.key.clone(), i);
                i
            }
        };
        &mut self.buffers[i].vertices
    }
}
