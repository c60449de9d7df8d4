/// Straight-alpha sRGB color with channels in `[0, 1]`.
///
/// Every constructor clamps, so a `Color` built through the public API is
/// always in range. NaN channels become `0`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[inline]
fn byte(v: i32) -> f32 {
    v.clamp(0, 255) as f32 / 255.0
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    /// Creates a color from unit-range components, clamping each to `[0, 1]`.
    #[inline]
    pub fn from_unit(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r: unit(r), g: unit(g), b: unit(b), a: unit(a) }
    }

    /// Creates a color from integer components, clamping each to `[0, 255]`.
    #[inline]
    pub fn from_u8_clamped(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r: byte(r), g: byte(g), b: byte(b), a: byte(a) }
    }

    /// Creates a color from a packed `0xAARRGGBB` value.
    #[inline]
    pub fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::from_u8_clamped(r.into(), g.into(), b.into(), a.into())
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: unit(a), ..self }
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// Quantizes to straight RGBA bytes.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (unit(v) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_components_are_clamped() {
        let c = Color::from_unit(1.5, -0.2, 0.5, 2.0);
        assert_eq!(c, Color { r: 1.0, g: 0.0, b: 0.5, a: 1.0 });
    }

    #[test]
    fn nan_becomes_zero() {
        assert_eq!(Color::from_unit(f32::NAN, 1.0, 1.0, 1.0).r, 0.0);
    }

    #[test]
    fn integer_components_are_clamped() {
        assert_eq!(Color::from_u8_clamped(300, -5, 255, 0).to_rgba8(), [255, 0, 255, 0]);
    }

    #[test]
    fn argb_unpacks_alpha_first() {
        assert_eq!(Color::from_argb(0x80FF_2010).to_rgba8(), [0xFF, 0x20, 0x10, 0x80]);
    }
}
