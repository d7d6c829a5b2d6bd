//! In-memory hosts shared by unit tests.

use crate::error::HostError;
use crate::gui::{GuiHost, RenderState, ScissorHost, WindowSize};
use crate::render::{
    BlendMode, BlendStrategy, Layer, LayerCache, LayerHandle, LayerKey, OutlineMode, PipelineCache, PipelineDesc, PipelineHost,
    PipelineId, ShapeKind, SplitBlend, TextureId,
};

/// Records every registration; optionally rejects pipelines or unknown textures.
#[derive(Default)]
pub(crate) struct RecordingHost {
    pub pipelines: Vec<PipelineDesc>,
    pub layers: Vec<LayerKey>,
    pub reject_pipelines: bool,
    /// `None` accepts every texture.
    pub known_textures: Option<Vec<TextureId>>,
}

impl PipelineHost for RecordingHost {
    fn register_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineId, HostError> {
        if self.reject_pipelines {
            return Err(HostError::PipelineRejected {
                location: desc.location,
                key: desc.key,
                reason: "rejected by test host".into(),
            });
        }
        self.pipelines.push(desc.clone());
        Ok(PipelineId(self.pipelines.len() as u32 - 1))
    }

    fn prepare_layer(&mut self, layer: &Layer) -> Result<(), HostError> {
        if let Some(known) = &self.known_textures {
            if !known.contains(&layer.texture) {
                return Err(HostError::UnknownTexture(layer.texture.clone()));
            }
        }
        self.layers.push(layer.key.clone());
        Ok(())
    }
}

/// Builds a standalone culled layer through a fresh cache.
pub(crate) fn layer(shape: ShapeKind, texture: &str, blend: BlendMode) -> LayerHandle {
    layer_with(&SplitBlend, shape, texture, blend)
}

/// Like [`layer`], with the layer setup decided by `strategy`.
pub(crate) fn layer_with(strategy: &dyn BlendStrategy, shape: ShapeKind, texture: &str, blend: BlendMode) -> LayerHandle {
    let mut layers = LayerCache::new(1536, OutlineMode::AffectsOutline);
    let mut pipelines = PipelineCache::new();
    let key = LayerKey::new(shape, TextureId::new(texture), true, blend);
    layers
        .get_or_create(key, &mut pipelines, strategy, &mut RecordingHost::default())
        .expect("recording host accepts every layer")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScissorCall {
    Enable(i32, i32, i32, i32),
    Disable,
}

/// GUI host that keeps submitted states and scissor calls in order.
pub(crate) struct RecordingGui {
    pub window: WindowSize,
    pub scissor_calls: Vec<ScissorCall>,
    pub states: Vec<RenderState>,
}

impl RecordingGui {
    pub fn new(window: WindowSize) -> Self {
        Self { window, scissor_calls: Vec::new(), states: Vec::new() }
    }
}

impl ScissorHost for RecordingGui {
    fn enable_scissor(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.scissor_calls.push(ScissorCall::Enable(x1, y1, x2, y2));
    }

    fn disable_scissor(&mut self) {
        self.scissor_calls.push(ScissorCall::Disable);
    }
}

impl GuiHost for RecordingGui {
    fn window(&self) -> WindowSize {
        self.window
    }

    fn submit(&mut self, state: RenderState) {
        self.states.push(state);
    }
}
