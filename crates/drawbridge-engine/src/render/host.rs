use crate::error::HostError;

use super::{Layer, PipelineDesc, PipelineId};

/// Host-side registration hooks used by the caches on a miss.
///
/// Registration is expected to be deterministic for a given description: the
/// caches never retry a failed call on their own.
pub trait PipelineHost {
    /// Compiles/registers a pipeline and returns the host's identifier for it.
    ///
    /// Called at most once per [`PipelineKey`](super::PipelineKey) while the
    /// pipeline cache is alive.
    fn register_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineId, HostError>;

    /// Validates a freshly assembled layer before it is cached.
    ///
    /// Hosts that bind textures eagerly reject unknown textures here.
    fn prepare_layer(&mut self, layer: &Layer) -> Result<(), HostError> {
        let _ = layer;
        Ok(())
    }
}
