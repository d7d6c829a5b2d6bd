use super::{Affine2, Vec2};

/// Axis-aligned integer rectangle in screen pixels (top-left origin).
///
/// Used for clip areas, scissor frames and render-state bounds. A rectangle
/// with a non-positive width or height is empty.
///
/// Edges are meaningful within `[-COORD_LIMIT, COORD_LIMIT - 1)` on both axes;
/// [`ClipRect::everything`] spans exactly that range, so anything beyond it
/// is clipped away by [`ClipRect::intersect`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClipRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ClipRect {
    /// The canonical empty rectangle returned by disjoint intersections.
    pub const EMPTY: ClipRect = ClipRect::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Magnitude bound of supported edges (2^30, about 1.07e9 pixels).
    pub const COORD_LIMIT: i32 = 1 << 30;

    /// The whole supported coordinate range; intersecting with it leaves any
    /// in-range rectangle unchanged.
    #[inline]
    pub const fn everything() -> Self {
        // right() = -2^30 + (2^31 - 1) = 2^30 - 1
        Self::new(-Self::COORD_LIMIT, -Self::COORD_LIMIT, i32::MAX, i32::MAX)
    }

    /// Builds a rectangle from edges. Inverted edges collapse to zero size.
    #[inline]
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right.saturating_sub(left).max(0), bottom.saturating_sub(top).max(0))
    }

    /// Smallest integer rectangle containing all `points`.
    ///
    /// Minimums are floored and maximums ceiled. Returns [`ClipRect::EMPTY`]
    /// when `points` is empty.
    pub fn bounding(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else { return Self::EMPTY };

        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Self::from_edges(min.x.floor() as i32, min.y.floor() as i32, max.x.ceil() as i32, max.y.ceil() as i32)
    }

    #[inline]
    pub fn left(self) -> i32 {
        self.x
    }

    #[inline]
    pub fn top(self) -> i32 {
        self.y
    }

    #[inline]
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.left() as f32
            && p.y >= self.top() as f32
            && p.x < self.right() as f32
            && p.y < self.bottom() as f32
    }

    /// Overlapping part of both rectangles, or [`ClipRect::EMPTY`] if they
    /// do not overlap (touching edges do not overlap).
    #[inline]
    pub fn intersect(self, other: ClipRect) -> ClipRect {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }

        let x0 = self.left().max(other.left());
        let y0 = self.top().max(other.top());
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            Self::EMPTY
        } else {
            Self::from_edges(x0, y0, x1, y1)
        }
    }

    /// Bounding box of the four corners after `pose`.
    pub fn transform_each_vertex(self, pose: &Affine2) -> ClipRect {
        if pose.is_identity() {
            return self;
        }
        let (l, t, r, b) = (self.left(), self.top(), self.right(), self.bottom());
        Self::bounding(
            [(l, t), (r, t), (r, b), (l, b)].map(|(x, y)| pose.transform_point(Vec2::from_pixels(x, y))),
        )
    }

    /// Converts to absolute device-pixel edges `(x1, y1, x2, y2)`.
    ///
    /// Outer edges are rounded outward so partially covered pixels stay visible.
    pub fn to_device_edges(self, scale: f32) -> (i32, i32, i32, i32) {
        (
            (self.left() as f32 * scale).floor() as i32,
            (self.top() as f32 * scale).floor() as i32,
            (self.right() as f32 * scale).ceil() as i32,
            (self.bottom() as f32 * scale).ceil() as i32,
        )
    }
}
