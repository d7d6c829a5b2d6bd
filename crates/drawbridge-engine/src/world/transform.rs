use crate::coords::{Mat4, Vec3};

/// Caller-supplied spatial transform applied before the pose.
///
/// Typical implementations project source coordinates (map tiles, model
/// space) into the host's world space. Closures `Fn(Vec3) -> Vec3` implement
/// this trait directly.
pub trait VertexTransformer {
    fn transform(&self, p: Vec3) -> Vec3;

    /// Transforms a normal located at `at`.
    ///
    /// The default maps two unit tangents of the surface through
    /// [`transform`] and takes their cross product, so the result stays
    /// perpendicular to the mapped surface under stretching and shear. The
    /// sign follows the mapped step along `n`, which keeps mirrored mappings
    /// facing the right way.
    ///
    /// [`transform`]: VertexTransformer::transform
    fn transform_normal(&self, at: Vec3, n: Vec3) -> Vec3 {
        let n = n.normalized();
        let t0 = n.any_orthogonal();
        let t1 = n.cross(t0);

        let base = self.transform(at);
        let along = self.transform(at + n) - base;
        let mapped = (self.transform(at + t0) - base).cross(self.transform(at + t1) - base);
        if mapped.dot(along) < 0.0 { -mapped.normalized() } else { mapped.normalized() }
    }
}

/// Leaves vertices untouched.
#[derive(Debug, Copy, Clone, Default)]
pub struct IdentityTransform;

impl VertexTransformer for IdentityTransform {
    #[inline]
    fn transform(&self, p: Vec3) -> Vec3 {
        p
    }

    #[inline]
    fn transform_normal(&self, _at: Vec3, n: Vec3) -> Vec3 {
        n
    }
}

impl VertexTransformer for Mat4 {
    #[inline]
    fn transform(&self, p: Vec3) -> Vec3 {
        self.transform_point(p)
    }

    #[inline]
    fn transform_normal(&self, _at: Vec3, n: Vec3) -> Vec3 {
        self.normal_matrix().transform(n).normalized()
    }
}

impl<F> VertexTransformer for F
where
    F: Fn(Vec3) -> Vec3,
{
    #[inline]
    fn transform(&self, p: Vec3) -> Vec3 {
        self(p)
    }
}
