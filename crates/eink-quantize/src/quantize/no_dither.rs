//! Plain nearest-color mapping.

use crate::palette::Palette;

use super::Quantize;

/// Maps every pixel to its nearest palette color. No error is carried.
///
/// Flat regions stay flat; gradients band into solid areas.
#[derive(Debug, Clone)]
pub struct NoDither {
    palette: Palette,
}

impl NoDither {
    /// Quantize against `palette`.
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Default for NoDither {
    fn default() -> Self {
        Self::new(Palette::acep7())
    }
}

impl Quantize for NoDither {
    fn quantize(&self, rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
        debug_assert_eq!(rgba.len(), width * height * 4);

        rgba.chunks_exact(4)
            .map(|px| {
                self.palette
                    .nearest_index(px[0] as f32, px[1] as f32, px[2] as f32)
            })
            .collect()
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dither_single_red_pixel() {
        let result = NoDither::default().quantize(&[255, 0, 0, 255], 1, 1);
        assert_eq!(result, vec![4]);
    }

    #[test]
    fn test_no_dither_ignores_alpha() {
        let opaque = NoDither::default().quantize(&[0, 0, 255, 255], 1, 1);
        let clear = NoDither::default().quantize(&[0, 0, 255, 0], 1, 1);
        assert_eq!(opaque, clear);
        assert_eq!(opaque, vec![3]);
    }

    #[test]
    fn test_no_dither_uniform_stays_uniform() {
        let rgba = [250, 150, 10, 255].repeat(12);
        let result = NoDither::default().quantize(&rgba, 4, 3);
        assert_eq!(result, vec![6; 12]);
    }

    #[test]
    fn test_no_dither_row_major_order() {
        #[rustfmt::skip]
        let rgba = [
            0, 0, 0, 255,     255, 255, 255, 255,
            0, 255, 0, 255,   255, 255, 0, 255,
        ];
        assert_eq!(NoDither::default().quantize(&rgba, 2, 2), vec![0, 1, 2, 5]);
    }
}
