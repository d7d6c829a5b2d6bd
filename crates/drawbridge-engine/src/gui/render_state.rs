use bytemuck::{Pod, Zeroable};

use crate::coords::{Affine2, ClipRect, Quad, Vec2};
use crate::paint::PackedColor;
use crate::render::TextureId;

/// Host GUI pipelines a render state can target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GuiPipeline {
    /// Position + color.
    Gui,
    /// Position + uv + color, sampling one texture.
    GuiTextured,
}

/// Textures bound for a render state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureSetup {
    Empty,
    Single(TextureId),
}

/// Untransformed GUI vertex (local screen pixels + uv).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScreenVertex {
    pub pos: Vec2,
    pub uv: Vec2,
}

impl ScreenVertex {
    #[inline]
    pub const fn new(pos: Vec2, uv: Vec2) -> Self {
        Self { pos, uv }
    }

    /// Vertex without texture coordinates.
    #[inline]
    pub const fn at(x: f32, y: f32) -> Self {
        Self { pos: Vec2::new(x, y), uv: Vec2::zero() }
    }
}

/// Flushed GUI vertex: pose applied, color packed as `Unorm8x4` RGBA.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GuiVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: u32,
}

/// Immutable snapshot of one 2D quad draw.
///
/// Built once per draw command and consumed by value at flush time; it is
/// intentionally not `Clone`.
#[derive(Debug, PartialEq)]
pub struct RenderState {
    pipeline: GuiPipeline,
    texture: TextureSetup,
    pose: Affine2,
    quad: Quad<ScreenVertex>,
    color: PackedColor,
    clip_area: Option<ClipRect>,
    bounds: ClipRect,
}

impl RenderState {
    pub fn new(
        pipeline: GuiPipeline,
        texture: TextureSetup,
        pose: Affine2,
        quad: Quad<ScreenVertex>,
        color: PackedColor,
        clip_area: Option<ClipRect>,
    ) -> Self {
        let bounds = compute_bounds(&quad, &pose, clip_area);
        Self { pipeline, texture, pose, quad, color, clip_area, bounds }
    }

    #[inline]
    pub fn pipeline(&self) -> GuiPipeline {
        self.pipeline
    }

    #[inline]
    pub fn texture(&self) -> &TextureSetup {
        &self.texture
    }

    #[inline]
    pub fn pose(&self) -> &Affine2 {
        &self.pose
    }

    #[inline]
    pub fn quad(&self) -> &Quad<ScreenVertex> {
        &self.quad
    }

    #[inline]
    pub fn color(&self) -> PackedColor {
        self.color
    }

    #[inline]
    pub fn clip_area(&self) -> Option<ClipRect> {
        self.clip_area
    }

    /// Screen-space bounds, advisory only (batching/culling).
    #[inline]
    pub fn bounds(&self) -> ClipRect {
        self.bounds
    }

    /// Appends the four pose-transformed vertices.
    pub fn setup_vertices(&self, out: &mut Vec<GuiVertex>) {
        let color = self.color.to_rgba_u32();
        out.extend(self.quad.vertices().into_iter().map(|v| GuiVertex {
            position: self.pose.transform_point(v.pos).to_array(),
            uv: v.uv.to_array(),
            color,
        }));
    }
}

/// Axis-aligned bounds of `quad` after `pose`, intersected with `clip`.
///
/// Corners are transformed first; the minimums are floored and the maximums
/// ceiled.
pub fn compute_bounds(quad: &Quad<ScreenVertex>, pose: &Affine2, clip: Option<ClipRect>) -> ClipRect {
    let raw = ClipRect::bounding(quad.vertices().into_iter().map(|v| pose.transform_point(v.pos)));
    match clip {
        Some(clip) => clip.intersect(raw),
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Quad<ScreenVertex> {
        Quad::new(
            ScreenVertex::at(0.0, 0.0),
            ScreenVertex::at(1.0, 0.0),
            ScreenVertex::at(1.0, 1.0),
            ScreenVertex::at(0.0, 1.0),
        )
    }

    fn state(pose: Affine2, clip: Option<ClipRect>) -> RenderState {
        RenderState::new(GuiPipeline::Gui, TextureSetup::Empty, pose, unit_quad(), PackedColor::WHITE, clip)
    }

    #[test]
    fn unit_quad_identity_bounds() {
        assert_eq!(state(Affine2::IDENTITY, None).bounds(), ClipRect::new(0, 0, 1, 1));
    }

    #[test]
    fn translation_shifts_bounds() {
        let s = state(Affine2::from_translation(10.0, 5.0), None);
        assert_eq!(s.bounds(), ClipRect::new(10, 5, 1, 1));
    }

    #[test]
    fn fractional_corners_round_outward() {
        let s = state(Affine2::from_translation(0.25, 0.75), None);
        assert_eq!(s.bounds(), ClipRect::from_edges(0, 0, 2, 2));
    }

    #[test]
    fn clip_area_restricts_bounds() {
        let mut pose = Affine2::IDENTITY;
        pose.scale(10.0, 10.0);
        let s = state(pose, Some(ClipRect::new(5, 5, 100, 100)));
        assert_eq!(s.bounds(), ClipRect::new(5, 5, 5, 5));
    }

    #[test]
    fn clip_area_outside_gives_empty_bounds() {
        let s = state(Affine2::IDENTITY, Some(ClipRect::new(50, 50, 10, 10)));
        assert!(s.bounds().is_empty());
    }

    #[test]
    fn setup_vertices_applies_pose_and_color() {
        let s = RenderState::new(
            GuiPipeline::Gui,
            TextureSetup::Empty,
            Affine2::from_translation(2.0, 3.0),
            unit_quad(),
            PackedColor(0x8011_2233),
            None,
        );
        let mut out = Vec::new();
        s.setup_vertices(&mut out);

        assert_eq!(out.len(), 4);
        assert_eq!(out[2].position, [3.0, 4.0]);
        assert_eq!(out[0].color.to_le_bytes(), [0x11, 0x22, 0x33, 0x80]);
    }
}
