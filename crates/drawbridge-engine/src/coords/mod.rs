//! Coordinate and geometry types shared by the world and GUI sides.
//!
//! GUI space:
//! - screen pixels (GUI-scaled, not device pixels)
//! - origin top-left
//! - +X right, +Y down
//!
//! World space is whatever the host's pose stack expects; the adapter only
//! multiplies through the current pose.

mod affine;
mod mat4;
mod rect;
mod shape;
mod vec2;
mod vec3;

pub use affine::Affine2;
pub use mat4::{Mat3, Mat4};
pub use rect::ClipRect;
pub use shape::{Quad, Triangle};
pub use vec2::Vec2;
pub use vec3::Vec3;
