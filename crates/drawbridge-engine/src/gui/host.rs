use super::RenderState;

/// GUI window metrics.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindowSize {
    /// Width in GUI-scaled screen pixels.
    pub scaled_width: u32,
    /// Height in GUI-scaled screen pixels.
    pub scaled_height: u32,
    /// Device pixels per screen pixel.
    pub scale_factor: f32,
}

impl WindowSize {
    #[inline]
    pub const fn new(scaled_width: u32, scaled_height: u32, scale_factor: f32) -> Self {
        Self { scaled_width, scaled_height, scale_factor }
    }

    /// A minimized or not yet laid out window: nothing can be visible.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.scaled_width == 0 || self.scaled_height == 0
    }
}

/// Host scissor primitive in absolute device pixels.
pub trait ScissorHost {
    fn enable_scissor(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    fn disable_scissor(&mut self);
}

/// Everything a [`GuiDrawContext`](super::GuiDrawContext) needs from the host.
pub trait GuiHost: ScissorHost {
    fn window(&self) -> WindowSize;

    /// Takes ownership of one render state for the next flush.
    fn submit(&mut self, state: RenderState);
}
