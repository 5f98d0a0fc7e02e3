//! Floyd-Steinberg error diffusion.
//!
//! Distributes 100% of the quantization error to 4 neighbors. Smooth
//! gradients, at the cost of some color bleeding on a 7-color palette.

use crate::palette::Palette;

use super::{quantize_with_kernel, Quantize, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion.
///
/// # Algorithm
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Weights: 7/16 right, 3/16 bottom-left, 5/16 bottom, 1/16 bottom-right.
/// Pixels are visited left to right on every row.
///
/// # Example
///
/// ```
/// use eink_quantize::{FloydSteinberg, Quantize};
///
/// let red = [255, 0, 0, 255];
/// assert_eq!(FloydSteinberg::default().quantize(&red, 1, 1), vec![4]);
/// ```
#[derive(Debug, Clone)]
pub struct FloydSteinberg {
    palette: Palette,
}

impl FloydSteinberg {
    /// Quantize against `palette`.
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Default for FloydSteinberg {
    fn default() -> Self {
        Self::new(Palette::acep7())
    }
}

impl Quantize for FloydSteinberg {
    fn quantize(&self, rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
        quantize_with_kernel(rgba, width, height, &self.palette, &FLOYD_STEINBERG)
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(value: u8, n: usize) -> Vec<u8> {
        [value, value, value, 255].repeat(n)
    }

    #[test]
    fn test_floyd_steinberg_exact_palette_colors() {
        // Zero error everywhere: output equals plain nearest
        let rgba = [
            0, 0, 0, 255, //
            255, 255, 255, 255, //
            0, 255, 0, 255, //
            255, 140, 0, 255,
        ];
        let result = FloydSteinberg::default().quantize(&rgba, 2, 2);
        assert_eq!(result, vec![0, 1, 2, 6]);
    }

    #[test]
    fn test_floyd_steinberg_mixes_mid_grey() {
        let quantizer = FloydSteinberg::new(Palette::monochrome());
        let result = quantizer.quantize(&grey(128, 4), 2, 2);

        assert_eq!(result.len(), 4);
        assert!(result.contains(&0) && result.contains(&1));
    }

    #[test]
    fn test_floyd_steinberg_preserves_average_brightness() {
        let quantizer = FloydSteinberg::new(Palette::monochrome());
        let (width, height) = (20, 20);
        // ~30% brightness
        let result = quantizer.quantize(&grey(77, width * height), width, height);

        let white_ratio =
            result.iter().filter(|&&i| i == 1).count() as f32 / (width * height) as f32;
        assert!(
            (white_ratio - 0.3).abs() < 0.1,
            "Expected ~0.3 white ratio, got {}",
            white_ratio
        );
    }

    #[test]
    fn test_floyd_steinberg_second_pixel_sees_error() {
        // Pixel 0 (128) rounds to white with error -127; 7/16 of that
        // pushes pixel 1 from 128 to ~72.4, which rounds to black.
        let quantizer = FloydSteinberg::new(Palette::monochrome());
        let result = quantizer.quantize(&grey(128, 2), 2, 1);
        assert_eq!(result, vec![1, 0]);
    }

    #[test]
    fn test_floyd_steinberg_is_deterministic() {
        let rgba: Vec<u8> = (0..64u32)
            .flat_map(|i| [(i * 4) as u8, (255 - i * 3) as u8, (i * 7 % 256) as u8, 255])
            .collect();
        let quantizer = FloydSteinberg::default();
        assert_eq!(quantizer.quantize(&rgba, 8, 8), quantizer.quantize(&rgba, 8, 8));
    }
}
