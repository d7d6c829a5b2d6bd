use crate::coords::{Affine2, ClipRect, Quad, Vec2};
use crate::paint::PackedColor;
use crate::render::TextureId;

use super::sprites::{checkbox_sprite, ButtonTextures, HoverState};
use super::{GuiHost, GuiPipeline, RenderState, ScissorStack, ScreenVertex, TextureSetup};

/// Color used for text selection highlights.
pub const TEXT_HIGHLIGHT: PackedColor = PackedColor(0xFF00_00FF);

/// Per-frame 2D draw surface.
///
/// Wraps the host's collector with a transform stack and a scissor stack.
/// Each draw command produces exactly one [`RenderState`], unless the active
/// clip is empty, in which case nothing is submitted.
///
/// # Clipping
///
/// ```ignore
/// ctx.push_clip(ClipRect::new(0, 0, 120, 80));
/// // ... draw children ...
/// ctx.pop_clip();
/// ```
pub struct GuiDrawContext<'h> {
    host: &'h mut dyn GuiHost,
    poses: Vec<Affine2>,
    scissor: ScissorStack,
    buttons: ButtonTextures,
}

impl<'h> GuiDrawContext<'h> {
    pub fn new(host: &'h mut dyn GuiHost) -> Self {
        Self {
            host,
            poses: vec![Affine2::IDENTITY],
            scissor: ScissorStack::new(),
            buttons: ButtonTextures::default(),
        }
    }

    /// Replaces the default button sprites.
    pub fn with_button_textures(mut self, buttons: ButtonTextures) -> Self {
        self.buttons = buttons;
        self
    }

    // ── transform stack ───────────────────────────────────────────────────

    #[inline]
    pub fn pose(&self) -> &Affine2 {
        // Invariant: never empty.
        &self.poses[self.poses.len() - 1]
    }

    #[inline]
    fn pose_mut(&mut self) -> &mut Affine2 {
        let last = self.poses.len() - 1;
        &mut self.poses[last]
    }

    pub fn push_matrix(&mut self) {
        let top = *self.pose();
        self.poses.push(top);
    }

    /// # Panics
    /// Panics when called without a matching [`push_matrix`](Self::push_matrix).
    pub fn pop_matrix(&mut self) {
        assert!(self.poses.len() > 1, "pop_matrix called without matching push_matrix");
        self.poses.pop();
    }

    /// GUI poses are 2D; there is no z translation.
    pub fn translate(&mut self, x: f32, y: f32) {
        self.pose_mut().translate(x, y);
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.pose_mut().scale(x, y);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    /// Begins a clip region given in local (pre-pose) coordinates.
    ///
    /// Must be paired with [`pop_clip`](Self::pop_clip) in the same draw scope.
    pub fn push_clip(&mut self, local: ClipRect) {
        let screen = local.transform_each_vertex(self.pose());
        let window = self.host.window();
        self.scissor.push(screen, window, &mut *self.host);
    }

    /// # Panics
    /// Panics when no clip is active.
    pub fn pop_clip(&mut self) {
        self.scissor.pop(&mut *self.host);
    }

    #[inline]
    pub fn clip_depth(&self) -> usize {
        self.scissor.depth()
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Solid quad with arbitrary corners (local coordinates).
    pub fn fill_quad(&mut self, quad: &Quad<Vec2>, color: PackedColor) -> bool {
        let quad = quad.map(|p| ScreenVertex::new(p, Vec2::zero()));
        self.submit(GuiPipeline::Gui, TextureSetup::Empty, quad, color)
    }

    /// Solid axis-aligned rectangle between two corners; corners may be given
    /// in any order.
    pub fn fill(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: PackedColor) -> bool {
        let (l, r) = (x1.min(x2) as f32, x1.max(x2) as f32);
        let (t, b) = (y1.min(y2) as f32, y1.max(y2) as f32);
        let quad = Quad::new(
            ScreenVertex::at(l, t),
            ScreenVertex::at(l, b),
            ScreenVertex::at(r, b),
            ScreenVertex::at(r, t),
        );
        self.submit(GuiPipeline::Gui, TextureSetup::Empty, quad, color)
    }

    pub fn draw_text_highlight(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> bool {
        self.fill(x1, y1, x2, y2, TEXT_HIGHLIGHT)
    }

    pub fn draw_button(&mut self, x: i32, y: i32, width: i32, height: i32, state: HoverState) -> bool {
        let sprite = self.buttons.for_state(state).clone();
        self.textured_rect(sprite, x, y, width, height, (0.0, 1.0, 0.0, 1.0), PackedColor::WHITE)
    }

    pub fn draw_checkbox(&mut self, x: i32, y: i32, width: i32, height: i32, focused: bool, checked: bool) -> bool {
        let sprite = checkbox_sprite(focused, checked);
        self.textured_rect(sprite, x, y, width, height, (0.0, 1.0, 0.0, 1.0), PackedColor::WHITE)
    }

    /// Draws the `[u0, u1] x [v0, v1]` region of `texture` into `(x, y, w, h)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_image(
        &mut self,
        texture: &TextureId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        u0: f32,
        u1: f32,
        v0: f32,
        v1: f32,
    ) -> bool {
        self.textured_rect(texture.clone(), x, y, width, height, (u0, u1, v0, v1), PackedColor::WHITE)
    }

    /// Draws all of `texture` into `(x, y, w, h)`.
    pub fn draw_whole_image(&mut self, texture: &TextureId, x: i32, y: i32, width: i32, height: i32) -> bool {
        self.draw_image(texture, x, y, width, height, 0.0, 1.0, 0.0, 1.0)
    }

    /// Ends the frame.
    ///
    /// # Panics
    /// Panics if clips or matrices are still pushed.
    pub fn finish(self) {
        assert_eq!(self.scissor.depth(), 0, "frame ended with {} clip(s) still pushed", self.scissor.depth());
        assert_eq!(self.poses.len(), 1, "frame ended with {} matrix push(es) outstanding", self.poses.len() - 1);
    }

    // ── internal ──────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn textured_rect(
        &mut self,
        texture: TextureId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        (u0, u1, v0, v1): (f32, f32, f32, f32),
        color: PackedColor,
    ) -> bool {
        let (r, b) = (x.saturating_add(width), y.saturating_add(height));
        let quad = Quad::new(
            ScreenVertex::new(Vec2::from_pixels(x, y), Vec2::new(u0, v0)),
            ScreenVertex::new(Vec2::from_pixels(x, b), Vec2::new(u0, v1)),
            ScreenVertex::new(Vec2::from_pixels(r, b), Vec2::new(u1, v1)),
            ScreenVertex::new(Vec2::from_pixels(r, y), Vec2::new(u1, v0)),
        );
        self.submit(GuiPipeline::GuiTextured, TextureSetup::Single(texture), quad, color)
    }

    /// Snapshots and submits one render state. Returns `false` if suppressed.
    fn submit(&mut self, pipeline: GuiPipeline, texture: TextureSetup, quad: Quad<ScreenVertex>, color: PackedColor) -> bool {
        if self.scissor.is_suppressed() {
            log::trace!("draw suppressed by empty clip at depth {}", self.scissor.depth());
            return false;
        }
        let state = RenderState::new(pipeline, texture, *self.pose(), quad, color, self.scissor.top());
        self.host.submit(state);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::WindowSize;
    use crate::test_support::{RecordingGui, ScissorCall};

    const WINDOW: WindowSize = WindowSize::new(200, 100, 1.0);

    #[test]
    fn each_command_submits_one_state() {
        let mut host = RecordingGui::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut host);
            let tex = TextureId::new("maps/tile");
            ctx.fill(0, 0, 10, 10, PackedColor::WHITE);
            ctx.draw_button(0, 0, 20, 20, HoverState::Idle);
            ctx.draw_checkbox(0, 0, 20, 20, false, true);
            ctx.draw_image(&tex, 0, 0, 8, 8, 0.0, 0.5, 0.0, 0.5);
            ctx.draw_whole_image(&tex, 0, 0, 8, 8);
            ctx.draw_text_highlight(1, 1, 2, 2);
            ctx.finish();
        }
        assert_eq!(host.states.len(), 6);
    }

    #[test]
    fn state_snapshots_pose_and_clip() {
        let mut host = RecordingGui::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut host);
            ctx.push_matrix();
            ctx.translate(10.0, 5.0);
            ctx.push_clip(ClipRect::new(0, 0, 50, 50));
            ctx.fill(0, 0, 1, 1, PackedColor::WHITE);
            ctx.pop_clip();
            ctx.pop_matrix();
            ctx.fill(0, 0, 1, 1, PackedColor::WHITE);
            ctx.finish();
        }
        let first = &host.states[0];
        assert_eq!(first.clip_area(), Some(ClipRect::new(10, 5, 50, 50)));
        assert_eq!(first.bounds(), ClipRect::new(10, 5, 1, 1));

        let second = &host.states[1];
        assert_eq!(second.clip_area(), None);
        assert_eq!(second.bounds(), ClipRect::new(0, 0, 1, 1));
        assert_eq!(host.scissor_calls, [ScissorCall::Enable(10, 5, 60, 55), ScissorCall::Disable]);
    }

    #[test]
    fn empty_clip_suppresses_draws() {
        let mut host = RecordingGui::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut host);
            ctx.push_clip(ClipRect::new(0, 0, 10, 10));
            ctx.push_clip(ClipRect::new(20, 20, 10, 10));
            assert!(!ctx.fill(0, 0, 5, 5, PackedColor::WHITE));
            ctx.pop_clip();
            assert!(ctx.fill(0, 0, 5, 5, PackedColor::WHITE));
            ctx.pop_clip();
            ctx.finish();
        }
        assert_eq!(host.states.len(), 1);
    }

    #[test]
    fn degenerate_window_draws_nothing_under_clip() {
        let window = WindowSize::new(0, 0, 1.0);
        let mut host = RecordingGui::new(window);
        {
            let mut ctx = GuiDrawContext::new(&mut host);
            ctx.push_clip(ClipRect::new(0, 0, 10, 10));
            ctx.draw_button(0, 0, 10, 10, HoverState::MouseOver);
            ctx.pop_clip();
            ctx.finish();
        }
        assert!(host.states.is_empty());
        assert!(host.scissor_calls.is_empty());
    }

    #[test]
    fn button_uses_textured_pipeline_and_sprite() {
        let mut host = RecordingGui::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut host);
            ctx.draw_button(4, 4, 20, 10, HoverState::Disabled);
        }
        let s = &host.states[0];
        assert_eq!(s.pipeline(), GuiPipeline::GuiTextured);
        assert_eq!(s.texture(), &TextureSetup::Single(TextureId::new("widget/button_disabled")));
        assert_eq!(s.bounds(), ClipRect::new(4, 4, 20, 10));
    }

    #[test]
    fn image_uvs_map_to_corners() {
        let mut host = RecordingGui::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut host);
            ctx.draw_image(&TextureId::new("t"), 0, 0, 4, 4, 0.25, 0.75, 0.1, 0.9);
        }
        let q = host.states[0].quad();
        assert_eq!(q.v0.uv, Vec2::new(0.25, 0.1));
        assert_eq!(q.v2.uv, Vec2::new(0.75, 0.9));
    }

    #[test]
    fn image_at_coordinate_edge_saturates() {
        let mut host = RecordingGui::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut host);
            assert!(ctx.draw_whole_image(&TextureId::new("t"), i32::MAX - 1, i32::MAX - 1, 10, 10));
        }
        let q = host.states[0].quad();
        assert_eq!(q.v2.pos, Vec2::new(i32::MAX as f32, i32::MAX as f32));
    }

    #[test]
    fn fill_accepts_swapped_corners() {
        let mut host = RecordingGui::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut host);
            ctx.fill(10, 10, 0, 0, PackedColor::WHITE);
        }
        assert_eq!(host.states[0].bounds(), ClipRect::new(0, 0, 10, 10));
    }

    #[test]
    #[should_panic(expected = "without matching push")]
    fn pop_clip_without_push_panics() {
        let mut host = RecordingGui::new(WINDOW);
        GuiDrawContext::new(&mut host).pop_clip();
    }

    #[test]
    #[should_panic(expected = "clip(s) still pushed")]
    fn finish_detects_unbalanced_clip() {
        let mut host = RecordingGui::new(WINDOW);
        let mut ctx = GuiDrawContext::new(&mut host);
        ctx.push_clip(ClipRect::new(0, 0, 10, 10));
        ctx.finish();
    }
}
