//! Ordered dithering with a 4x4 Bayer matrix.
//!
//! Each pixel is nudged by a fixed, position-dependent offset before the
//! nearest-color lookup. No error is carried between pixels, so the output
//! for one pixel depends only on its own value and coordinates.

use crate::palette::Palette;

use super::Quantize;

/// 4x4 Bayer threshold matrix, indexed `[y % 4][x % 4]`.
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Peak-to-peak amplitude of the threshold offset, in 8-bit channel units.
pub const BAYER_STRENGTH: f32 = 50.0;

/// Offset added to every channel at `(x, y)`.
///
/// Ranges from -25.0 (matrix value 0) to 21.875 (matrix value 15).
#[inline]
pub fn bayer_offset(x: usize, y: usize) -> f32 {
    (BAYER_4X4[y % 4][x % 4] as f32 / 16.0 - 0.5) * BAYER_STRENGTH
}

/// Ordered (Bayer) dithering.
///
/// For every pixel: add [`bayer_offset`] to each of r, g, b, clamp to
/// `0.0..=255.0`, then take the nearest palette color. Produces the regular
/// cross-hatch texture of retro displays.
#[derive(Debug, Clone)]
pub struct OrderedBayer {
    palette: Palette,
}

impl OrderedBayer {
    /// Quantize against `palette`.
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Default for OrderedBayer {
    fn default() -> Self {
        Self::new(Palette::acep7())
    }
}

impl Quantize for OrderedBayer {
    fn quantize(&self, rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
        debug_assert_eq!(rgba.len(), width * height * 4);

        let mut output = Vec::with_capacity(width * height);
        for (i, px) in rgba.chunks_exact(4).enumerate() {
            let offset = bayer_offset(i % width, i / width);
            let adjust = |c: u8| (c as f32 + offset).clamp(0.0, 255.0);
            output.push(
                self.palette
                    .nearest_index(adjust(px[0]), adjust(px[1]), adjust(px[2])),
            );
        }
        output
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }
}
