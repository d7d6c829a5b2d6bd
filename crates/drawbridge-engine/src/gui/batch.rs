use std::ops::Range;

use crate::coords::ClipRect;

use super::{GuiHost, GuiPipeline, GuiVertex, RenderState, ScissorHost, TextureSetup, WindowSize};

/// One draw call worth of GUI quads.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiDraw {
    pub pipeline: GuiPipeline,
    pub texture: TextureSetup,
    /// Clip in screen pixels; `None` draws unclipped.
    pub scissor: Option<ClipRect>,
    /// Range into [`GuiFrame::vertices`]; always a multiple of 4 long.
    pub vertices: Range<u32>,
}

/// Flattened output of one GUI frame.
#[derive(Debug, Default)]
pub struct GuiFrame {
    pub vertices: Vec<GuiVertex>,
    pub draws: Vec<GuiDraw>,
}

impl GuiFrame {
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// In-memory [`GuiHost`] that queues render states until [`flush`](Self::flush).
///
/// Consecutive states sharing pipeline, texture, and clip are merged into a
/// single [`GuiDraw`], the same way the shape renderers group instances by
/// clip rect.
#[derive(Debug)]
pub struct GuiBatch {
    window: WindowSize,
    states: Vec<RenderState>,
    active_scissor: Option<(i32, i32, i32, i32)>,
}

impl GuiBatch {
    pub fn new(window: WindowSize) -> Self {
        Self { window, states: Vec::new(), active_scissor: None }
    }

    pub fn resize(&mut self, window: WindowSize) {
        self.window = window;
    }

    /// Number of states waiting for the next flush.
    #[inline]
    pub fn pending(&self) -> usize {
        self.states.len()
    }

    /// Device-pixel scissor the host would currently have installed.
    #[inline]
    pub fn active_scissor(&self) -> Option<(i32, i32, i32, i32)> {
        self.active_scissor
    }

    /// Drains the queued states into vertex data plus draw ranges.
    pub fn flush(&mut self) -> GuiFrame {
        let mut frame = GuiFrame {
            vertices: Vec::with_capacity(self.states.len() * 4),
            draws: Vec::new(),
        };

        for state in self.states.drain(..) {
            let start = frame.vertices.len() as u32;
            state.setup_vertices(&mut frame.vertices);
            let end = frame.vertices.len() as u32;

            let extends_last = frame.draws.last().is_some_and(|last| {
                last.pipeline == state.pipeline()
                    && last.texture == *state.texture()
                    && last.scissor == state.clip_area()
            });
            if let Some(last) = frame.draws.last_mut().filter(|_| extends_last) {
                last.vertices.end = end;
            } else {
                frame.draws.push(GuiDraw {
                    pipeline: state.pipeline(),
                    texture: state.texture().clone(),
                    scissor: state.clip_area(),
                    vertices: start..end,
                });
            }
        }

        log::trace!("gui flush: {} quads in {} draws", frame.quad_count(), frame.draws.len());
        frame
    }
}

impl ScissorHost for GuiBatch {
    fn enable_scissor(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.active_scissor = Some((x1, y1, x2, y2));
    }

    fn disable_scissor(&mut self) {
        self.active_scissor = None;
    }
}

impl GuiHost for GuiBatch {
    fn window(&self) -> WindowSize {
        self.window
    }

    fn submit(&mut self, state: RenderState) {
        self.states.push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::{GuiDrawContext, HoverState};
    use crate::paint::PackedColor;
    use crate::render::TextureId;

    const WINDOW: WindowSize = WindowSize::new(640, 480, 1.0);

    #[test]
    fn consecutive_compatible_states_merge() {
        let mut batch = GuiBatch::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut batch);
            ctx.fill(0, 0, 10, 10, PackedColor::WHITE);
            ctx.fill(10, 0, 20, 10, PackedColor(0xFF00_FF00));
            ctx.draw_button(0, 20, 40, 10, HoverState::Idle);
            ctx.fill(0, 40, 10, 50, PackedColor::WHITE);
            ctx.finish();
        }
        assert_eq!(batch.pending(), 4);

        let frame = batch.flush();
        assert_eq!(frame.quad_count(), 4);
        assert_eq!(frame.draws.len(), 3);
        assert_eq!(frame.draws[0].vertices, 0..8);
        assert_eq!(frame.draws[1].pipeline, GuiPipeline::GuiTextured);
        assert_eq!(frame.draws[2].vertices, 12..16);
        assert_eq!(batch.pending(), 0);
    }

    #[test]
    fn clip_change_splits_draws() {
        let mut batch = GuiBatch::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut batch);
            ctx.fill(0, 0, 10, 10, PackedColor::WHITE);
            ctx.push_clip(ClipRect::new(0, 0, 5, 5));
            ctx.fill(0, 0, 10, 10, PackedColor::WHITE);
            ctx.pop_clip();
            ctx.finish();
        }
        let frame = batch.flush();
        assert_eq!(frame.draws.len(), 2);
        assert_eq!(frame.draws[0].scissor, None);
        assert_eq!(frame.draws[1].scissor, Some(ClipRect::new(0, 0, 5, 5)));
    }

    #[test]
    fn texture_change_splits_draws() {
        let mut batch = GuiBatch::new(WINDOW);
        {
            let mut ctx = GuiDrawContext::new(&mut batch);
            ctx.draw_whole_image(&TextureId::new("a"), 0, 0, 4, 4);
            ctx.draw_whole_image(&TextureId::new("b"), 0, 0, 4, 4);
        }
        assert_eq!(batch.flush().draws.len(), 2);
    }

    #[test]
    fn scissor_calls_track_active_rect() {
        let mut batch = GuiBatch::new(WindowSize::new(100, 100, 2.0));
        {
            let mut ctx = GuiDrawContext::new(&mut batch);
            ctx.push_clip(ClipRect::new(1, 2, 3, 4));
        }
        assert_eq!(batch.active_scissor(), Some((2, 4, 8, 12)));
        batch.disable_scissor();
        assert_eq!(batch.active_scissor(), None);
    }
}
