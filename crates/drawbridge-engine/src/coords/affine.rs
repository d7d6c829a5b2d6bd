use super::Vec2;

/// 2D affine transform (3x2 matrix) used by the GUI pose stack.
///
/// Layout matches a column-major 3x3 matrix with an implicit `[0, 0, 1]` row:
///
/// ```text
/// | m00 m10 m20 |
/// | m01 m11 m21 |
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    pub m00: f32,
    pub m01: f32,
    pub m10: f32,
    pub m11: f32,
    pub m20: f32,
    pub m21: f32,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2 {
        m00: 1.0,
        m01: 0.0,
        m10: 0.0,
        m11: 1.0,
        m20: 0.0,
        m21: 0.0,
    };

    #[inline]
    pub const fn from_translation(x: f32, y: f32) -> Self {
        Self { m20: x, m21: y, ..Self::IDENTITY }
    }

    #[inline]
    pub const fn from_scale(x: f32, y: f32) -> Self {
        Self { m00: x, m11: y, ..Self::IDENTITY }
    }

    /// Post-multiplies a translation (`self * T(x, y)`).
    #[inline]
    pub fn translate(&mut self, x: f32, y: f32) {
        self.m20 += self.m00 * x + self.m10 * y;
        self.m21 += self.m01 * x + self.m11 * y;
    }

    /// Post-multiplies a scale (`self * S(x, y)`).
    #[inline]
    pub fn scale(&mut self, x: f32, y: f32) {
        self.m00 *= x;
        self.m01 *= x;
        self.m10 *= y;
        self.m11 *= y;
    }

    /// Returns `self * rhs` (`rhs` is applied first).
    pub fn mul(&self, rhs: &Affine2) -> Affine2 {
        Affine2 {
            m00: self.m00 * rhs.m00 + self.m10 * rhs.m01,
            m01: self.m01 * rhs.m00 + self.m11 * rhs.m01,
            m10: self.m00 * rhs.m10 + self.m10 * rhs.m11,
            m11: self.m01 * rhs.m10 + self.m11 * rhs.m11,
            m20: self.m00 * rhs.m20 + self.m10 * rhs.m21 + self.m20,
            m21: self.m01 * rhs.m20 + self.m11 * rhs.m21 + self.m21,
        }
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.m00 * p.x + self.m10 * p.y + self.m20,
            self.m01 * p.x + self.m11 * p.y + self.m21,
        )
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}
