//! Two-level luma dithering.

use crate::color::luma;
use crate::palette::Palette;

use super::{diffuse_error, Quantize, WorkingBuffer, FLOYD_STEINBERG};

/// Luma above this maps to white; at or below it maps to black.
pub const LUMA_THRESHOLD: f32 = 127.0;

/// Black-and-white dithering on the two-entry palette.
///
/// Each pixel's luma (`0.299 r + 0.587 g + 0.114 b`) is thresholded at
/// [`LUMA_THRESHOLD`]. The scalar error `luma - (0 or 255)` is added to all
/// three channels of the neighbors with the Floyd-Steinberg weights, so the
/// next pixel's luma moves by exactly the diffused amount.
///
/// Output indices are 0 (black) and 1 (white), which coincide with the
/// first two entries of the 7-color panel palette.
#[derive(Debug, Clone)]
pub struct BlackAndWhite {
    palette: Palette,
}

impl BlackAndWhite {
    pub fn new() -> Self {
        Self {
            palette: Palette::monochrome(),
        }
    }
}

impl Default for BlackAndWhite {
    fn default() -> Self {
        Self::new()
    }
}

impl Quantize for BlackAndWhite {
    fn quantize(&self, rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
        let mut output = vec![0u8; width * height];
        let mut working = WorkingBuffer::from_rgba(rgba, width, height);

        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = working.get(x, y);
                let l = luma(r, g, b);
                let (idx, level) = if l > LUMA_THRESHOLD {
                    (1u8, 255.0)
                } else {
                    (0u8, 0.0)
                };
                output[y * width + x] = idx;

                let err = l - level;
                diffuse_error(&mut working, x, y, [err, err, err], &FLOYD_STEINBERG);
            }
        }

        output
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
    fn test_threshold_boundary() {
        let bw = BlackAndWhite::new();
        assert_eq!(bw.quantize(&grey(128, 1), 1, 1), vec![1]);
        assert_eq!(bw.quantize(&grey(127, 1), 1, 1), vec![0]);
    }

    #[test]
    fn test_first_pixel_of_mid_grey_is_white() {
        let bw = BlackAndWhite::new();
        let result = bw.quantize(&grey(128, 16), 4, 4);
        assert_eq!(result[0], 1);
        // Diffused error then produces a mix
        assert!(result.contains(&0));
    }

    #[test]
    fn test_pure_green_uses_luma_not_distance() {
        // Luma of pure green is ~149.7: white, even though (0,255,0) is
        // nearer black than white by RGB distance
        let bw = BlackAndWhite::new();
        assert_eq!(bw.quantize(&[0, 255, 0, 255], 1, 1), vec![1]);
        // Pure blue (~29.1) goes black
        assert_eq!(bw.quantize(&[0, 0, 255, 255], 1, 1), vec![0]);
    }

    #[test]
    fn test_scalar_error_diffusion() {
        // Pixel 0: luma 100 -> black, error +100; pixel 1 gets 7/16 of it
        // on every channel: 100 + 43.75 = 143.75 -> white.
        let bw = BlackAndWhite::new();
        assert_eq!(bw.quantize(&grey(100, 2), 2, 1), vec![0, 1]);
    }

    #[test]
    fn test_only_two_indices() {
        let rgba: Vec<u8> = (0..100u32)
            .flat_map(|i| [(i * 37 % 256) as u8, (i * 91 % 256) as u8, (i * 13 % 256) as u8, 255])
            .collect();
        let result = BlackAndWhite::new().quantize(&rgba, 10, 10);
        assert!(result.iter().all(|&i| i <= 1));
        assert_eq!(BlackAndWhite::new().palette().len(), 2);
    }
}
