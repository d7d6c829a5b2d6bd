use crate::coords::ClipRect;

use super::{ScissorHost, WindowSize};

/// One pushed clip region.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScissorFrame {
    /// Effective clip in screen pixels, already intersected with every parent.
    pub rect: ClipRect,
    /// Stack depth after this frame was pushed (1 for the outermost frame).
    pub depth: usize,
    /// Device-pixel edges sent to the host, `None` for an empty frame.
    device: Option<(i32, i32, i32, i32)>,
}

/// Depth-counted clip stack that keeps the host scissor in sync.
///
/// The host primitive is not stacked: `enable` replaces the active rect and
/// `disable` clears it. Empty frames (zero-size window or no overlap with the
/// parent) never reach the host; draws under them are suppressed instead.
#[derive(Debug, Default)]
pub struct ScissorStack {
    frames: Vec<ScissorFrame>,
    host_active: bool,
}

impl ScissorStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Current effective clip, `None` when nothing is pushed.
    #[inline]
    pub fn top(&self) -> Option<ClipRect> {
        self.frames.last().map(|f| f.rect)
    }

    /// True while the innermost clip is empty.
    #[inline]
    pub fn is_suppressed(&self) -> bool {
        self.frames.last().is_some_and(|f| f.rect.is_empty())
    }

    /// Pushes `rect` (screen pixels, same space as the current top).
    ///
    /// Returns the effective clip after intersection.
    pub fn push<H: ScissorHost + ?Sized>(&mut self, rect: ClipRect, window: WindowSize, host: &mut H) -> ClipRect {
        let effective = if window.is_degenerate() {
            ClipRect::EMPTY
        } else {
            match self.top() {
                None => rect,
                Some(parent) => parent.intersect(rect),
            }
        };

        let device = if effective.is_empty() {
            log::trace!("empty scissor at depth {}; suppressing draws", self.frames.len() + 1);
            None
        } else {
            let edges = effective.to_device_edges(window.scale_factor);
            host.enable_scissor(edges.0, edges.1, edges.2, edges.3);
            self.host_active = true;
            Some(edges)
        };

        self.frames.push(ScissorFrame { rect: effective, depth: self.frames.len() + 1, device });
        effective
    }

    /// Pops the innermost frame and restores the host to the parent frame.
    ///
    /// # Panics
    /// Panics at depth 0.
    pub fn pop<H: ScissorHost + ?Sized>(&mut self, host: &mut H) {
        assert!(!self.frames.is_empty(), "ScissorStack::pop called without matching push");
        self.frames.pop();

        match self.frames.last() {
            None => {
                if self.host_active {
                    host.disable_scissor();
                    self.host_active = false;
                }
            }
            Some(ScissorFrame { device: Some((x1, y1, x2, y2)), .. }) => {
                host.enable_scissor(*x1, *y1, *x2, *y2);
                self.host_active = true;
            }
            // Parent is empty: draws stay suppressed, host state is irrelevant.
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingGui, ScissorCall};

    const WINDOW: WindowSize = WindowSize::new(320, 240, 2.0);

    #[test]
    fn push_intersects_with_parent() {
        let mut host = RecordingGui::new(WINDOW);
        let mut s = ScissorStack::new();

        s.push(ClipRect::new(0, 0, 100, 100), WINDOW, &mut host);
        let inner = s.push(ClipRect::new(50, 50, 100, 100), WINDOW, &mut host);

        assert_eq!(inner, ClipRect::new(50, 50, 50, 50));
        assert_eq!(s.depth(), 2);
        assert_eq!(
            host.scissor_calls,
            [ScissorCall::Enable(0, 0, 200, 200), ScissorCall::Enable(100, 100, 200, 200)]
        );
    }

    #[test]
    fn balanced_sequence_restores_depth_and_host() {
        let mut host = RecordingGui::new(WINDOW);
        let mut s = ScissorStack::new();

        s.push(ClipRect::new(0, 0, 10, 10), WINDOW, &mut host);
        s.push(ClipRect::new(2, 2, 4, 4), WINDOW, &mut host);
        s.pop(&mut host);
        assert_eq!(s.depth(), 1);
        s.pop(&mut host);
        assert_eq!(s.depth(), 0);

        assert_eq!(host.scissor_calls.last(), Some(&ScissorCall::Disable));
        // Popping back to the outer frame re-installs it.
        assert_eq!(host.scissor_calls[2], ScissorCall::Enable(0, 0, 20, 20));
    }

    #[test]
    #[should_panic(expected = "without matching push")]
    fn pop_on_empty_stack_panics() {
        let mut host = RecordingGui::new(WINDOW);
        ScissorStack::new().pop(&mut host);
    }

    #[test]
    fn degenerate_window_skips_host() {
        let window = WindowSize::new(0, 240, 1.0);
        let mut host = RecordingGui::new(window);
        let mut s = ScissorStack::new();

        s.push(ClipRect::new(0, 0, 10, 10), window, &mut host);
        assert!(s.is_suppressed());
        assert_eq!(s.depth(), 1);
        s.pop(&mut host);

        assert!(host.scissor_calls.is_empty());
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn disjoint_child_suppresses_until_popped() {
        let mut host = RecordingGui::new(WINDOW);
        let mut s = ScissorStack::new();

        s.push(ClipRect::new(0, 0, 10, 10), WINDOW, &mut host);
        s.push(ClipRect::new(50, 50, 10, 10), WINDOW, &mut host);
        assert!(s.is_suppressed());
        // Nested pushes under an empty frame stay empty.
        s.push(ClipRect::new(0, 0, 5, 5), WINDOW, &mut host);
        assert!(s.is_suppressed());
        s.pop(&mut host);
        s.pop(&mut host);
        assert!(!s.is_suppressed());
        assert_eq!(s.top(), Some(ClipRect::new(0, 0, 10, 10)));
        assert_eq!(host.scissor_calls.len(), 2);
    }

    #[test]
    fn frames_record_depth() {
        let mut host = RecordingGui::new(WINDOW);
        let mut s = ScissorStack::new();
        for i in 1..=3 {
            s.push(ClipRect::new(0, 0, 100, 100), WINDOW, &mut host);
            assert_eq!(s.frames.last().map(|f| f.depth), Some(i));
        }
    }
}
