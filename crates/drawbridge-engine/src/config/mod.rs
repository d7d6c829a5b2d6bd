//! Adapter configuration.
//!
//! The defaults reproduce the host versions that register separate opaque and
//! translucent pipelines. Hosts that fold both into one pipeline select
//! [`BlendPolicy::Unified`].

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::render::OutlineMode;

/// Environment variable read by [`AdapterConfig::from_env`].
pub const BLEND_POLICY_ENV: &str = "DRAWBRIDGE_BLEND_POLICY";

/// Default vertex-buffer size hint attached to every layer, in bytes.
pub const DEFAULT_EXPECTED_BUFFER_SIZE: usize = 1536;

/// How opaque and translucent geometry map onto host pipelines.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum BlendPolicy {
    /// One pipeline per (draw mode, cull); translucency is a per-layer flag.
    Unified,
    /// Separate opaque and translucent pipeline families.
    #[default]
    Split,
}

impl FromStr for BlendPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unified" => Ok(BlendPolicy::Unified),
            "split" => Ok(BlendPolicy::Split),
            _ => Err(ConfigError::UnknownBlendPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for BlendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlendPolicy::Unified => "unified",
            BlendPolicy::Split => "split",
        })
    }
}

/// Construction parameters for [`Adapter`](crate::adapter::Adapter).
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    /// Blend wiring strategy.
    pub blend_policy: BlendPolicy,

    /// Buffer size hint (bytes) the host may use to pre-size layer buffers.
    pub expected_buffer_size: usize,

    /// Whether layers participate in the host's entity outline pass.
    pub outline: OutlineMode,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            blend_policy: BlendPolicy::default(),
            expected_buffer_size: DEFAULT_EXPECTED_BUFFER_SIZE,
            outline: OutlineMode::AffectsOutline,
        }
    }
}

impl AdapterConfig {
    /// Defaults, with the blend policy overridden by [`BLEND_POLICY_ENV`] when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(BLEND_POLICY_ENV) {
            config.blend_policy = value.parse()?;
        }
        Ok(config)
    }

    pub fn with_blend_policy(mut self, policy: BlendPolicy) -> Self {
        self.blend_policy = policy;
        self
    }

    pub fn with_expected_buffer_size(mut self, bytes: usize) -> Self {
        self.expected_buffer_size = bytes;
        self
    }

    pub fn with_outline(mut self, outline: OutlineMode) -> Self {
        self.outline = outline;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policies_case_insensitively() {
        assert_eq!("Unified".parse::<BlendPolicy>(), Ok(BlendPolicy::Unified));
        assert_eq!(" split ".parse::<BlendPolicy>(), Ok(BlendPolicy::Split));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert_eq!(
            "blended".parse::<BlendPolicy>(),
            Err(ConfigError::UnknownBlendPolicy("blended".into()))
        );
    }

    #[test]
    fn defaults() {
        let c = AdapterConfig::default();
        assert_eq!(c.blend_policy, BlendPolicy::Split);
        assert_eq!(c.expected_buffer_size, 1536);
        assert_eq!(c.outline, OutlineMode::AffectsOutline);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for p in [BlendPolicy::Unified, BlendPolicy::Split] {
            assert_eq!(p.to_string().parse::<BlendPolicy>(), Ok(p));
        }
    }
}
