use super::Vec3;

/// Column-major 4x4 matrix for the world pose stack.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    #[inline]
    pub fn from_translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [t.x, t.y, t.z, 1.0];
        m
    }

    #[inline]
    pub fn from_scale(s: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = s.x;
        m.cols[1][1] = s.y;
        m.cols[2][2] = s.z;
        m
    }

    /// Right-handed orthographic projection with a `[0, 1]` depth range.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let fnr = 1.0 / (far - near);
        Mat4 {
            cols: [
                [2.0 * rl, 0.0, 0.0, 0.0],
                [0.0, 2.0 * tb, 0.0, 0.0],
                [0.0, 0.0, -fnr, 0.0],
                [-(right + left) * rl, -(top + bottom) * tb, -near * fnr, 1.0],
            ],
        }
    }

    /// Returns `self * rhs` (`rhs` is applied first).
    pub fn mul(&self, rhs: &Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, cell) in col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Mat4 { cols: out }
    }

    /// Transforms a point (`w = 1`). No perspective divide.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }

    /// Matrix that maps surface normals under this transform (inverse-transpose
    /// of the upper-left block). Translation does not affect it.
    #[inline]
    pub fn normal_matrix(&self) -> Mat3 {
        self.linear().inverse_transpose()
    }

    /// Upper-left 3x3 block.
    #[inline]
    pub fn linear(&self) -> Mat3 {
        let c = &self.cols;
        Mat3 {
            cols: [
                [c[0][0], c[0][1], c[0][2]],
                [c[1][0], c[1][1], c[1][2]],
                [c[2][0], c[2][1], c[2][2]],
            ],
        }
    }
}

/// Column-major 3x3 matrix; used as the normal matrix of a pose.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub cols: [[f32; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        cols: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub fn from_scale(s: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = s.x;
        m.cols[1][1] = s.y;
        m.cols[2][2] = s.z;
        m
    }

    pub fn mul(&self, rhs: &Mat3) -> Mat3 {
        let mut out = [[0.0f32; 3]; 3];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, cell) in col.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Mat3 { cols: out }
    }

    #[inline]
    fn col(&self, i: usize) -> Vec3 {
        let [x, y, z] = self.cols[i];
        Vec3::new(x, y, z)
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.col(0).dot(self.col(1).cross(self.col(2)))
    }

    /// Inverse-transpose, built from column cross products.
    ///
    /// A singular matrix yields its cofactor matrix unscaled. That still maps
    /// normals of the surviving directions correctly once renormalized.
    pub fn inverse_transpose(&self) -> Mat3 {
        let (c0, c1, c2) = (self.col(0), self.col(1), self.col(2));
        let det = c0.dot(c1.cross(c2));
        let inv = if det != 0.0 && det.is_finite() { 1.0 / det } else { 1.0 };
        let cols = [c1.cross(c2) * inv, c2.cross(c0) * inv, c0.cross(c1) * inv];
        Mat3 { cols: cols.map(Vec3::to_array) }
    }

    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * v.x + c[1][0] * v.y + c[2][0] * v.z,
            c[0][1] * v.x + c[1][1] * v.y + c[2][1] * v.z,
            c[0][2] * v.x + c[1][2] * v.y + c[2][2] * v.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_moves_points_only() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_point(Vec3::zero()), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.linear(), Mat3::IDENTITY);
    }

    #[test]
    fn mul_applies_rhs_first() {
        let t = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let s = Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0));
        // T * S: scale, then translate.
        assert_eq!(t.mul(&s).transform_point(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(3.0, 2.0, 2.0));
        // S * T: translate, then scale.
        assert_eq!(s.mul(&t).transform_point(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn inverse_transpose_of_scale_is_reciprocal() {
        let m = Mat3::from_scale(Vec3::new(2.0, 4.0, -1.0));
        assert_eq!(m.determinant(), -8.0);
        assert_eq!(m.inverse_transpose(), Mat3::from_scale(Vec3::new(0.5, 0.25, -1.0)));
    }

    #[test]
    fn inverse_transpose_undoes_shear_on_normals() {
        // x' = x + y. The plane y = 0 stays put, so its normal must too.
        let mut shear = Mat4::IDENTITY;
        shear.cols[1][0] = 1.0;
        let n = shear.normal_matrix().transform(Vec3::UP).normalized();
        let tangent = shear.linear().transform(Vec3::new(1.0, 0.0, 0.0));
        assert!(n.dot(tangent).abs() < 1e-6);
        // And the plane x = 0 tilts: its tangent (0,1,0) now points along (1,1,0).
        let n = shear.normal_matrix().transform(Vec3::new(1.0, 0.0, 0.0));
        assert!(n.dot(shear.linear().transform(Vec3::UP)).abs() < 1e-6);
    }

    #[test]
    fn orthographic_maps_corners_to_ndc() {
        let m = Mat4::orthographic(0.0, 100.0, 0.0, 50.0, -1.0, 1.0);
        let lo = m.transform_point(Vec3::new(0.0, 0.0, 0.0));
        let hi = m.transform_point(Vec3::new(100.0, 50.0, 0.0));
        assert!((lo.x + 1.0).abs() < 1e-6 && (lo.y + 1.0).abs() < 1e-6);
        assert!((hi.x - 1.0).abs() < 1e-6 && (hi.y - 1.0).abs() < 1e-6);
    }
}
