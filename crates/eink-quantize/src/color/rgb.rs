//! 8-bit RGB color type

use std::fmt;

/// An 8-bit RGB triple.
///
/// Used for palette entries and for background colors. Pixel buffers stay
/// as flat interleaved RGBA bytes; this type is for the handful of named
/// colors the pipeline deals with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels as floats, for distance math against working buffers.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Rec. 601 luma in 0.0..=255.0.
    ///
    /// Weights are applied as integer thousandths so that neutral greys
    /// produce exactly their channel value (128 gray has luma 128.0, not
    /// 127.99998).
    #[inline]
    pub fn luma(self) -> f32 {
        luma(self.r as f32, self.g as f32, self.b as f32)
    }
}

/// Rec. 601 luma of float channels: `0.299 r + 0.587 g + 0.114 b`.
#[inline]
pub(crate) fn luma(r: f32, g: f32, b: f32) -> f32 {
    (299.0 * r + 587.0 * g + 114.0 * b) / 1000.0
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Rgb::new(18, 52, 86).to_string(), "#123456");
        assert_eq!(Rgb::new(255, 140, 0).to_string(), "#FF8C00");
    }

    #[test]
    fn test_luma_of_neutral_grey_is_exact() {
        assert_eq!(Rgb::new(128, 128, 128).luma(), 128.0);
        assert_eq!(Rgb::new(127, 127, 127).luma(), 127.0);
        assert_eq!(Rgb::BLACK.luma(), 0.0);
        assert_eq!(Rgb::WHITE.luma(), 255.0);
    }

    #[test]
    fn test_luma_weights() {
        // Pure green carries most of the luma
        assert!((Rgb::new(0, 255, 0).luma() - 149.685).abs() < 1e-3);
        assert!((Rgb::new(255, 0, 0).luma() - 76.245).abs() < 1e-3);
        assert!((Rgb::new(0, 0, 255).luma() - 29.07).abs() < 1e-3);
    }
}
