//! Color model shared by the world and GUI sides.
//!
//! The host consumes colors in two shapes:
//! - packed 32-bit ARGB for GUI render states
//! - straight-alpha float RGBA for world vertices

pub mod color;

pub use color::PackedColor;
