//! Palette quantization and dithering.
//!
//! This module reduces an RGBA canvas to one palette index per pixel.
//!
//! # Algorithms
//!
//! - **Floyd-Steinberg**: error diffusion, 100% propagation
//! - **Atkinson**: error diffusion, 75% propagation (lighter, less noise)
//! - **Ordered (Bayer)**: 4x4 threshold matrix, no cross-pixel state
//! - **No dithering**: plain nearest color
//! - **Black & White**: luma threshold with Floyd-Steinberg diffusion of the
//!   scalar luma error, on the two-entry palette
//!
//! # Architecture
//!
//! All algorithms implement the [`Quantize`] trait. [`Algorithm`] names
//! them for selection and runs one against a [`CanvasFrame`].
//!
//! Every quantizer takes the input as a shared borrow and diffuses error in
//! its own [`WorkingBuffer`], so running several algorithms over the same
//! canvas can never leak state between them.
//!
//! # Example
//!
//! ```
//! use eink_quantize::{FloydSteinberg, Quantize};
//!
//! let rgba = vec![128u8; 4 * 4 * 4];
//! let indices = FloydSteinberg::default().quantize(&rgba, 4, 4);
//! assert_eq!(indices.len(), 16);
//! ```

mod atkinson;
mod black_and_white;
mod floyd_steinberg;
mod kernel;
mod no_dither;
mod ordered;

pub use atkinson::Atkinson;
pub use black_and_white::{BlackAndWhite, LUMA_THRESHOLD};
pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, ATKINSON, FLOYD_STEINBERG};
pub use no_dither::NoDither;
pub use ordered::{OrderedBayer, BAYER_4X4, BAYER_STRENGTH};

use std::fmt;
use std::str::FromStr;

use crate::frame::{CanvasFrame, QuantizedFrame};
use crate::palette::Palette;

/// Trait for palette quantizers.
///
/// Implementors are pure functions of their input: no state survives
/// between calls and the input buffer is never modified.
pub trait Quantize {
    /// Quantize an RGBA image to palette indices.
    ///
    /// # Arguments
    ///
    /// * `rgba` - Interleaved 8-bit RGBA, row-major, `width * height * 4` bytes.
    ///   Alpha is ignored.
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    ///
    /// # Returns
    ///
    /// One index per pixel in row-major order, each in `0..palette().len()`.
    fn quantize(&self, rgba: &[u8], width: usize, height: usize) -> Vec<u8>;

    /// Palette the returned indices refer to.
    fn palette(&self) -> &Palette;
}

/// Float copy of an image's RGB channels that error diffusion writes into.
///
/// Values are never re-clamped while a pass runs: a channel may drift
/// below 0 or above 255 and the overshoot is carried forward.
#[derive(Debug, Clone)]
pub struct WorkingBuffer {
    data: Vec<[f32; 3]>,
    width: usize,
    height: usize,
}

impl WorkingBuffer {
    /// Copy the RGB channels of an RGBA buffer.
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(
            rgba.len(),
            width * height * 4,
            "rgba length ({}) must be width * height * 4 ({}x{}x4)",
            rgba.len(),
            width,
            height,
        );
        let data = rgba
            .chunks_exact(4)
            .map(|px| [px[0] as f32, px[1] as f32, px[2] as f32])
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Current value at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        self.data[y * self.width + x]
    }

    /// Add `delta` at signed coordinates; outside the image it is dropped.
    #[inline]
    pub fn add(&mut self, x: i64, y: i64, delta: [f32; 3]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let px = &mut self.data[y as usize * self.width + x as usize];
        px[0] += delta[0];
        px[1] += delta[1];
        px[2] += delta[2];
    }
}

/// Spread `error` from `(x, y)` to the kernel's neighbors.
///
/// Neighbors outside the image receive nothing and their share is lost,
/// not redistributed.
#[inline]
pub fn diffuse_error(
    buffer: &mut WorkingBuffer,
    x: usize,
    y: usize,
    error: [f32; 3],
    kernel: &Kernel,
) {
    let divisor = kernel.divisor as f32;
    for &(dx, dy, weight) in kernel.entries {
        let factor = weight as f32 / divisor;
        buffer.add(
            x as i64 + dx as i64,
            y as i64 + dy as i64,
            [error[0] * factor, error[1] * factor, error[2] * factor],
        );
    }
}

/// Core error diffusion loop parameterized by kernel.
///
/// Visits pixels in raster order, maps each working value to the nearest
/// palette color and diffuses `working - chosen` with `kernel`.
pub(crate) fn quantize_with_kernel(
    rgba: &[u8],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    let mut working = WorkingBuffer::from_rgba(rgba, width, height);

    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = working.get(x, y);
            let idx = palette.nearest_index(r, g, b);
            output[y * width + x] = idx;

            let [pr, pg, pb] = palette.color_f32(idx as usize);
            diffuse_error(&mut working, x, y, [r - pr, g - pg, b - pb], kernel);
        }
    }

    output
}

/// The selectable quantization algorithms.
///
/// [`Algorithm::ALL`] lists them in the order they are offered for
/// side-by-side comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Algorithm {
    /// Floyd-Steinberg error diffusion.
    #[default]
    FloydSteinberg,
    /// Atkinson error diffusion.
    Atkinson,
    /// 4x4 Bayer ordered dithering.
    OrderedBayer,
    /// Nearest color, no dithering.
    NoDither,
    /// Two-level luma dithering.
    BlackAndWhite,
}

impl Algorithm {
    /// Every algorithm, in comparison order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::FloydSteinberg,
        Algorithm::Atkinson,
        Algorithm::OrderedBayer,
        Algorithm::NoDither,
        Algorithm::BlackAndWhite,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::FloydSteinberg => "Floyd-Steinberg",
            Algorithm::Atkinson => "Atkinson",
            Algorithm::OrderedBayer => "Ordered (Bayer)",
            Algorithm::NoDither => "No Dithering",
            Algorithm::BlackAndWhite => "Black & White",
        }
    }

    /// One-line description of the look it produces.
    pub fn description(self) -> &'static str {
        match self {
            Algorithm::FloydSteinberg => "Balanced, natural look",
            Algorithm::Atkinson => "Softer, less noise",
            Algorithm::OrderedBayer => "Retro, patterned",
            Algorithm::NoDither => "Pure colors, cartoon style",
            Algorithm::BlackAndWhite => "Classic B&W, 2 colors",
        }
    }

    /// Identifier for command lines and config files.
    pub fn slug(self) -> &'static str {
        match self {
            Algorithm::FloydSteinberg => "floyd-steinberg",
            Algorithm::Atkinson => "atkinson",
            Algorithm::OrderedBayer => "ordered",
            Algorithm::NoDither => "none",
            Algorithm::BlackAndWhite => "black-and-white",
        }
    }

    /// Palette this algorithm quantizes to.
    pub fn palette(self) -> Palette {
        match self {
            Algorithm::BlackAndWhite => Palette::monochrome(),
            _ => Palette::acep7(),
        }
    }

    /// Boxed quantizer for this algorithm on its default palette.
    pub fn quantizer(self) -> Box<dyn Quantize> {
        match self {
            Algorithm::FloydSteinberg => Box::new(FloydSteinberg::default()),
            Algorithm::Atkinson => Box::new(Atkinson::default()),
            Algorithm::OrderedBayer => Box::new(OrderedBayer::default()),
            Algorithm::NoDither => Box::new(NoDither::default()),
            Algorithm::BlackAndWhite => Box::new(BlackAndWhite::new()),
        }
    }

    /// Quantize a canvas snapshot.
    pub fn run(self, frame: &CanvasFrame) -> QuantizedFrame {
        let quantizer = self.quantizer();
        let indices = quantizer.quantize(frame.pixels(), frame.width(), frame.height());
        QuantizedFrame::new(
            self,
            indices,
            frame.width(),
            frame.height(),
            quantizer.palette().clone(),
        )
    }
}

/// Run every algorithm over the same snapshot, sequentially, in
/// [`Algorithm::ALL`] order.
pub fn compare_all(frame: &CanvasFrame) -> Vec<QuantizedFrame> {
    Algorithm::ALL.iter().map(|a| a.run(frame)).collect()
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an algorithm name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlgorithmError(pub String);

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Algorithm::ALL.iter().map(|a| a.slug()).collect();
        write!(
            f,
            "unknown algorithm '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for ParseAlgorithmError {}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    /// Accepts the slug or the display name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Algorithm::ALL
            .iter()
            .copied()
            .find(|a| a.slug().eq_ignore_ascii_case(needle) || a.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseAlgorithmError(s.to_string()))
    }
}
