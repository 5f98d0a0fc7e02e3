//! Palette struct and nearest-color matching.
//!
//! This module provides the core `Palette` type: an ordered list of device
//! colors where the position of each color IS the 4-bit code the panel
//! firmware expects. Reordering a palette changes what the panel displays.

use std::collections::HashSet;

use super::error::PaletteError;
use crate::color::Rgb;

/// The 7-color ACeP panel palette, in device lookup-table order.
///
/// | index | color  |
/// |-------|--------|
/// | 0     | black  |
/// | 1     | white  |
/// | 2     | green  |
/// | 3     | blue   |
/// | 4     | red    |
/// | 5     | yellow |
/// | 6     | orange |
pub const ACEP_7: [Rgb; 7] = [
    Rgb::new(0, 0, 0),
    Rgb::new(255, 255, 255),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 140, 0),
];

/// Two-entry subset used by black-and-white mode. Indices match [`ACEP_7`].
pub const MONOCHROME: [Rgb; 2] = [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)];

/// Largest palette a packed nibble can address.
pub const MAX_PALETTE_LEN: usize = 16;

/// Squared distance between opposite corners of the 8-bit RGB cube.
///
/// Upper bound of [`Palette::find_nearest`] distances for in-gamut queries.
/// Error-diffusion working values may leave the cube, so the search itself
/// is seeded from the first palette entry instead of from this bound.
pub const MAX_DISTANCE_SQ: f32 = 3.0 * 255.0 * 255.0;

/// An ordered set of device colors with nearest-color matching.
///
/// # Precomputation
///
/// Float copies of every entry are computed once at construction, so the
/// per-pixel search is a plain scan over `[f32; 3]`.
///
/// # Example
///
/// ```
/// use eink_quantize::{Palette, Rgb};
///
/// let palette = Palette::acep7();
/// assert_eq!(palette.len(), 7);
/// assert_eq!(palette.color(4), Rgb::new(255, 0, 0));
/// assert_eq!(palette.nearest_index(250.0, 10.0, 5.0), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
    colors_f32: Vec<[f32; 3]>,
}

impl Palette {
    /// Create a palette from colors in device order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `colors` is empty ([`PaletteError::EmptyPalette`])
    /// - `colors` has more than 16 entries ([`PaletteError::TooManyColors`])
    /// - a color appears twice ([`PaletteError::DuplicateColor`])
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_LEN {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
                max: MAX_PALETTE_LEN,
            });
        }

        let mut seen = HashSet::new();
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        Ok(Self {
            colors: colors.to_vec(),
            colors_f32: colors.iter().map(|c| c.to_f32()).collect(),
        })
    }

    /// The 7-color panel palette ([`ACEP_7`]).
    pub fn acep7() -> Self {
        Self::from_valid(&ACEP_7)
    }

    /// The black/white palette ([`MONOCHROME`]).
    pub fn monochrome() -> Self {
        Self::from_valid(&MONOCHROME)
    }

    // Constant tables are known-valid; skip the checks.
    fn from_valid(colors: &[Rgb]) -> Self {
        Self {
            colors: colors.to_vec(),
            colors_f32: colors.iter().map(|c| c.to_f32()).collect(),
        }
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if the palette is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn color(&self, idx: usize) -> Rgb {
        self.colors[idx]
    }

    /// All colors in device order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color at `idx` as floats.
    #[inline]
    pub fn color_f32(&self, idx: usize) -> [f32; 3] {
        self.colors_f32[idx]
    }

    /// Position of an exact color, if present.
    pub fn index_of(&self, color: Rgb) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }

    /// Find the nearest palette color by Euclidean RGB distance.
    ///
    /// Returns `(index, squared_distance)`. Scans in palette order and keeps
    /// the first entry with the smallest distance, so ties always resolve to
    /// the lower index. Channels may lie outside 0..=255 (accumulated
    /// diffusion error); they are not clamped.
    #[inline]
    pub fn find_nearest(&self, r: f32, g: f32, b: f32) -> (usize, f32) {
        let mut best_idx = 0;
        let mut best_dist = distance_sq([r, g, b], self.colors_f32[0]);

        for (i, &entry) in self.colors_f32.iter().enumerate().skip(1) {
            let dist = distance_sq([r, g, b], entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        (best_idx, best_dist)
    }

    /// Index of the nearest palette color. See [`find_nearest`](Self::find_nearest).
    #[inline]
    pub fn nearest_index(&self, r: f32, g: f32, b: f32) -> u8 {
        // len <= 16, so the index always fits
        self.find_nearest(r, g, b).0 as u8
    }
}

#[inline]
fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}
