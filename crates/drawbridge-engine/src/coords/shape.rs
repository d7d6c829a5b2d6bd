/// Four ordered vertices.
///
/// Winding order is the caller's responsibility and must match the host's
/// cull convention.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad<V> {
    pub v0: V,
    pub v1: V,
    pub v2: V,
    pub v3: V,
}

impl<V> Quad<V> {
    #[inline]
    pub const fn new(v0: V, v1: V, v2: V, v3: V) -> Self {
        Self { v0, v1, v2, v3 }
    }

    #[inline]
    pub fn vertices(&self) -> [&V; 4] {
        [&self.v0, &self.v1, &self.v2, &self.v3]
    }

    pub fn map<U>(self, mut f: impl FnMut(V) -> U) -> Quad<U> {
        Quad::new(f(self.v0), f(self.v1), f(self.v2), f(self.v3))
    }
}

/// Three ordered vertices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle<V> {
    pub v0: V,
    pub v1: V,
    pub v2: V,
}

impl<V> Triangle<V> {
    #[inline]
    pub const fn new(v0: V, v1: V, v2: V) -> Self {
        Self { v0, v1, v2 }
    }

    #[inline]
    pub fn vertices(&self) -> [&V; 3] {
        [&self.v0, &self.v1, &self.v2]
    }
}
