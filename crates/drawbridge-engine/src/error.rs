//! Library error types.
//!
//! Misuse of the adapter (emitting without a context, unbalanced clip or
//! matrix stacks, partial primitives) panics instead of returning an error.
//! Only conditions the host reports are surfaced here.

use crate::render::{PipelineKey, TextureId};

/// Failure reported by a host while creating a cached resource.
///
/// Returned unchanged from cache lookups; nothing is cached for the failing
/// key, so the next lookup asks the host again.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host rejected pipeline `{location}` for {key:?}: {reason}")]
    PipelineRejected {
        location: &'static str,
        key: PipelineKey,
        reason: String,
    },

    #[error("texture `{0}` is not registered with the host")]
    UnknownTexture(TextureId),
}

/// Invalid adapter configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown blend policy `{0}` (expected `unified` or `split`)")]
    UnknownBlendPolicy(String),
}
