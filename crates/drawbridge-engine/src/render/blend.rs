use crate::config::BlendPolicy;

use super::{BlendMode, DrawMode, PipelineKey};

/// Maps a requested blend mode onto pipeline keys and layer setup.
///
/// Both strategies share [`PipelineDesc::entity`](super::PipelineDesc::entity),
/// so vertex layout and sampler bindings cannot diverge between them.
pub trait BlendStrategy {
    fn policy(&self) -> BlendPolicy;

    /// Pipeline key that serves geometry of `blend` for `draw_mode`/`cull`.
    fn pipeline_key(&self, draw_mode: DrawMode, cull: bool, blend: BlendMode) -> PipelineKey;

    /// Whether the generated layer setup carries the translucent flag.
    fn translucent_setup(&self, blend: BlendMode) -> bool {
        blend == BlendMode::Translucent
    }
}

/// One alpha-blended pipeline per (draw mode, cull); opaque geometry is
/// distinguished by the layer's setup flag only.
#[derive(Debug, Copy, Clone, Default)]
pub struct UnifiedBlend;

impl BlendStrategy for UnifiedBlend {
    fn policy(&self) -> BlendPolicy {
        BlendPolicy::Unified
    }

    fn pipeline_key(&self, draw_mode: DrawMode, cull: bool, _blend: BlendMode) -> PipelineKey {
        PipelineKey::new(draw_mode, cull, BlendMode::Translucent)
    }
}

/// Separate opaque and translucent pipeline families.
#[derive(Debug, Copy, Clone, Default)]
pub struct SplitBlend;

impl BlendStrategy for SplitBlend {
    fn policy(&self) -> BlendPolicy {
        BlendPolicy::Split
    }

    fn pipeline_key(&self, draw_mode: DrawMode, cull: bool, blend: BlendMode) -> PipelineKey {
        PipelineKey::new(draw_mode, cull, blend)
    }
}

impl BlendPolicy {
    pub fn strategy(self) -> Box<dyn BlendStrategy> {
        match self {
            BlendPolicy::Unified => Box::new(UnifiedBlend),
            BlendPolicy::Split => Box::new(SplitBlend),
        }
    }
}
