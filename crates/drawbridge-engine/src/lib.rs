//! Drawbridge rendering adapter.
//!
//! Stable, semantic draw calls (textured quads and triangles, 2D GUI quads,
//! clip regions) on top of a host renderer whose pipeline, vertex-format and
//! scissor APIs change between releases. The core lives in [`adapter`],
//! [`render`], [`world`] and [`gui`]; [`device`] is one concrete `wgpu` host.

pub mod adapter;
pub mod config;
pub mod coords;
pub mod device;
pub mod error;
pub mod gui;
pub mod logging;
pub mod paint;
pub mod render;
pub mod world;

#[cfg(test)]
mod test_support;

pub use adapter::{Adapter, CacheStats};
pub use config::{AdapterConfig, BlendPolicy};
pub use error::{ConfigError, HostError};
