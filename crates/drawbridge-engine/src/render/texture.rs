use std::fmt;
use std::sync::Arc;

/// Opaque texture or sprite identifier (e.g. `"widget/button"`).
///
/// The adapter never interprets the name; it is passed through to the host
/// unchanged and used as part of layer cache keys. Cloning is cheap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(Arc<str>);

impl TextureId {
    #[inline]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({:?})", &*self.0)
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextureId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
