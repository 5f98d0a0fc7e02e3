//! One algorithm's output for a canvas snapshot.
//!
//! The indexed form is canonical; RGB previews are computed on demand by
//! looking up palette colors.

use crate::palette::Palette;
use crate::quantize::Algorithm;

/// Palette indices produced by one [`Algorithm`] for one canvas.
///
/// Stores one `u8` per pixel in row-major order, the dimensions, and the
/// palette the indices refer to. Frames are built whole by
/// [`Algorithm::run`]; there is no way to get a partially filled one.
///
/// # Example
///
/// ```
/// use eink_quantize::{Algorithm, Palette, QuantizedFrame};
///
/// let frame = QuantizedFrame::new(
///     Algorithm::NoDither,
///     vec![0, 1, 4, 6],
///     2,
///     2,
///     Palette::acep7(),
/// );
/// assert_eq!(frame.to_rgb()[6..9], [255, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedFrame {
    algorithm: Algorithm,
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl QuantizedFrame {
    /// Wrap quantizer output.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height` and that every
    /// index addresses `palette`.
    pub fn new(
        algorithm: Algorithm,
        indices: Vec<u8>,
        width: usize,
        height: usize,
        palette: Palette,
    ) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{}={})",
            indices.len(),
            width,
            height,
            width * height,
        );
        debug_assert!(indices.iter().all(|&i| (i as usize) < palette.len()));
        Self {
            algorithm,
            indices,
            width,
            height,
            palette,
        }
    }

    /// The algorithm that produced this frame.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Palette indices, row-major.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Preview as `[R, G, B, ...]`, `width * height * 3` bytes.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.color(idx as usize).to_bytes());
        }
        rgb
    }

    /// Preview as opaque `[R, G, B, A, ...]`, `width * height * 4` bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.indices.len() * 4);
        for &idx in &self.indices {
            let [r, g, b] = self.palette.color(idx as usize).to_bytes();
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
        rgba
    }

    /// Count of pixels per palette index, indexed like the palette.
    pub fn histogram(&self) -> Vec<usize> {
        let mut counts = vec![0; self.palette.len()];
        for &idx in &self.indices {
            counts[idx as usize] += 1;
        }
        counts
    }
}
