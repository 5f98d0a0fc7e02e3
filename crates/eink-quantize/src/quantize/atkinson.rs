//! Atkinson error diffusion.

use crate::palette::Palette;

use super::{quantize_with_kernel, Quantize, ATKINSON};

/// Atkinson error diffusion.
///
/// Spreads 6/8 of the error over 6 neighbors and throws the rest away.
/// Highlights and shadows stay clean, which suits a small panel palette.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
///
/// (1/8 each)
#[derive(Debug, Clone)]
pub struct Atkinson {
    palette: Palette,
}

impl Atkinson {
    /// Quantize against `palette`.
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Default for Atkinson {
    fn default() -> Self {
        Self::new(Palette::acep7())
    }
}

impl Quantize for Atkinson {
    fn quantize(&self, rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
        quantize_with_kernel(rgba, width, height, &self.palette, &ATKINSON)
    }

    fn palette(&self) -> &Palette {
        &self.palette
    }
}
