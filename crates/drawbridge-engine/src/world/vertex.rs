use bytemuck::{Pod, Zeroable};

use crate::coords::{Vec2, Vec3};

/// Packed overlay coordinate meaning "no hurt/flash tint" (u = 0, v = 10).
pub const DEFAULT_OVERLAY: u32 = 0x000A_0000;

/// Packed lightmap coordinate for full block and sky light.
pub const FULL_BRIGHT: u32 = 0x00F0_00F0;

/// Position + texture coordinate.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PosTex {
    pub pos: Vec3,
    pub tex: Vec2,
}

impl PosTex {
    #[inline]
    pub const fn new(pos: Vec3, tex: Vec2) -> Self {
        Self { pos, tex }
    }
}

/// Position + texture coordinate + normal.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PosTexNorm {
    pub pos: Vec3,
    pub tex: Vec2,
    pub normal: Vec3,
}

impl PosTexNorm {
    #[inline]
    pub const fn new(pos: Vec3, tex: Vec2, normal: Vec3) -> Self {
        Self { pos, tex, normal }
    }
}

/// One record of the host's `POSITION_COLOR_TEXTURE_OVERLAY_LIGHT_NORMAL` stream.
///
/// Positions and normals are already multiplied through the pose.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct EntityVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub overlay: u32,
    pub light: u32,
    pub normal: [f32; 3],
}
