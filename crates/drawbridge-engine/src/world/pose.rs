use crate::coords::{Mat3, Mat4, Vec3};

/// One frame of the pose stack: position matrix plus normal matrix.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PoseEntry {
    pub position: Mat4,
    pub normal: Mat3,
}

impl PoseEntry {
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.position.transform_point(p)
    }

    /// Transforms and renormalizes a normal.
    #[inline]
    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        self.normal.transform(n).normalized()
    }
}

/// Host-style matrix stack for world rendering.
///
/// The root entry always exists; popping it is a caller bug.
#[derive(Debug, Clone)]
pub struct PoseStack {
    stack: Vec<PoseEntry>,
}

impl Default for PoseStack {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseStack {
    pub fn new() -> Self {
        Self { stack: vec![PoseEntry::default()] }
    }

    #[inline]
    pub fn peek(&self) -> &PoseEntry {
        // Invariant: never empty.
        &self.stack[self.stack.len() - 1]
    }

    #[inline]
    fn top_mut(&mut self) -> &mut PoseEntry {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Number of entries above the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn push(&mut self) {
        let top = *self.peek();
        self.stack.push(top);
    }

    /// # Panics
    /// Panics if only the root entry is left.
    pub fn pop(&mut self) {
        assert!(self.stack.len() > 1, "PoseStack::pop called without matching push");
        self.stack.pop();
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        let top = self.top_mut();
        top.position = top.position.mul(&Mat4::from_translation(Vec3::new(x, y, z)));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        let top = self.top_mut();
        top.position = top.position.mul(&Mat4::from_scale(Vec3::new(x, y, z)));

        if x == y && y == z {
            // Uniform scale only flips normals when negative.
            if x < 0.0 {
                top.normal = top.normal.mul(&Mat3::from_scale(Vec3::new(-1.0, -1.0, -1.0)));
            }
            return;
        }
        top.normal = top.normal.mul(&Mat3::from_scale(Vec3::new(1.0 / x, 1.0 / y, 1.0 / z)));
    }

    /// Post-multiplies `m`; normals follow its inverse-transpose.
    pub fn multiply(&mut self, m: &Mat4) {
        let top = self.top_mut();
        top.position = top.position.mul(m);
        top.normal = top.normal.mul(&m.normal_matrix());
    }
}
