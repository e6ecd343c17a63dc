/// Linear RGBA color.
///
/// Scene colors are authored as sRGB hex literals (`0xf0f0f0`) and converted to
/// linear space on construction, so lighting math and blending happen in
/// linear space and the sRGB surface encodes on write.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::linear(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::linear(1.0, 1.0, 1.0);

    /// Opaque color from linear components.
    #[inline]
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a `0xRRGGBB` sRGB literal.
    #[inline]
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as u8;
        let g = ((hex >> 8) & 0xff) as u8;
        let b = (hex & 0xff) as u8;
        Self::from_srgb_u8(r, g, b)
    }

    /// Opaque color from sRGB bytes.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::linear(
            srgb_to_linear(r as f32 / 255.0),
            srgb_to_linear(g as f32 / 255.0),
            srgb_to_linear(b as f32 / 255.0),
        )
    }

    /// Returns the RGB components multiplied by `k`; alpha is kept.
    #[inline]
    pub fn scaled(self, k: f32) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

/// sRGB transfer function (IEC 61966-2-1), decode direction.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_white_and_black_are_exact() {
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
        assert_eq!(Color::from_hex(0x000000), Color::BLACK);
    }

    #[test]
    fn hex_channels_are_decoded_in_order() {
        let c = Color::from_hex(0xff0000);
        assert_eq!((c.r, c.g, c.b), (1.0, 0.0, 0.0));
    }

    #[test]
    fn mid_grey_is_darker_in_linear_space() {
        // 0x80 ≈ 0.502 sRGB ≈ 0.216 linear.
        let c = Color::from_hex(0x808080);
        assert!((c.r - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn scaled_keeps_alpha() {
        let c = Color::WHITE.scaled(0.5);
        assert_eq!(c.to_array(), [0.5, 0.5, 0.5, 1.0]);
    }
}
