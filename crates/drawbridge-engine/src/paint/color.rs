/// Packed 32-bit ARGB color (`0xAARRGGBB`), straight alpha.
///
/// This is the color representation GUI render states carry through to the
/// flush stage unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PackedColor(pub u32);

impl PackedColor {
    pub const WHITE: PackedColor = PackedColor(0xFFFF_FFFF);
    pub const TRANSPARENT: PackedColor = PackedColor(0);

    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// White with the given alpha in `[0, 1]`.
    #[inline]
    pub fn white(alpha: f32) -> Self {
        Self::from_argb(unit_to_u8(alpha), 0xFF, 0xFF, 0xFF)
    }

    /// Creates a color from straight float components in `[0, 1]`.
    #[inline]
    pub fn from_rgba_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::from_argb(unit_to_u8(a), unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Straight-alpha `[r, g, b, a]` in `[0, 1]`.
    #[inline]
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.red() as f32 / 255.0,
            self.green() as f32 / 255.0,
            self.blue() as f32 / 255.0,
            self.alpha() as f32 / 255.0,
        ]
    }

    /// Byte order expected by `Unorm8x4` vertex attributes (`[r, g, b, a]`).
    #[inline]
    pub const fn to_rgba_u32(self) -> u32 {
        u32::from_le_bytes([self.red(), self.green(), self.blue(), self.alpha()])
    }
}

impl From<u32> for PackedColor {
    #[inline]
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_unpack() {
        let c = PackedColor(0xFF00_00FF);
        assert_eq!((c.alpha(), c.red(), c.green(), c.blue()), (0xFF, 0, 0, 0xFF));
    }

    #[test]
    fn white_alpha_rounds() {
        assert_eq!(PackedColor::white(1.0), PackedColor::WHITE);
        assert_eq!(PackedColor::white(0.5).alpha(), 128);
        assert_eq!(PackedColor::white(-3.0).alpha(), 0);
    }

    #[test]
    fn rgba_u32_is_little_endian_rgba() {
        let c = PackedColor::from_argb(0x40, 0x10, 0x20, 0x30);
        assert_eq!(c.to_rgba_u32().to_le_bytes(), [0x10, 0x20, 0x30, 0x40]);
    }
}
