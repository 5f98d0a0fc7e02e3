//! Fixed-size RGBA canvas.

use std::fmt;

use crate::color::Rgb;

/// Canvas width in pixels (portrait orientation of the 600x448 panel).
pub const CANVAS_WIDTH: usize = 448;

/// Canvas height in pixels.
pub const CANVAS_HEIGHT: usize = 600;

/// Error returned when a buffer cannot become a [`CanvasFrame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Buffer length is not `CANVAS_WIDTH * CANVAS_HEIGHT * 4`.
    WrongLength { expected: usize, actual: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::WrongLength { expected, actual } => write!(
                f,
                "canvas buffer has {} bytes, expected {} ({}x{} RGBA)",
                actual, expected, CANVAS_WIDTH, CANVAS_HEIGHT
            ),
        }
    }
}

impl std::error::Error for FrameError {}

/// A 448x600 RGBA raster, row-major, 4 bytes per pixel.
///
/// Produced by [`TransformEngine::render`](crate::TransformEngine::render)
/// and frozen on crop confirmation. Every pixel is opaque.
#[derive(Clone, PartialEq, Eq)]
pub struct CanvasFrame {
    rgba: Vec<u8>,
}

impl CanvasFrame {
    /// Number of bytes in a canvas buffer.
    pub const LEN: usize = CANVAS_WIDTH * CANVAS_HEIGHT * 4;

    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    ///
    /// [`FrameError::WrongLength`] unless `rgba.len() == CanvasFrame::LEN`.
    pub fn from_rgba(rgba: Vec<u8>) -> Result<Self, FrameError> {
        if rgba.len() != Self::LEN {
            return Err(FrameError::WrongLength {
                expected: Self::LEN,
                actual: rgba.len(),
            });
        }
        Ok(Self { rgba })
    }

    /// A canvas filled with one color.
    pub fn filled(color: Rgb) -> Self {
        Self {
            rgba: [color.r, color.g, color.b, 255].repeat(CANVAS_WIDTH * CANVAS_HEIGHT),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        CANVAS_WIDTH
    }

    #[inline]
    pub fn height(&self) -> usize {
        CANVAS_HEIGHT
    }

    /// The RGBA bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    /// RGB of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        assert!(x < CANVAS_WIDTH && y < CANVAS_HEIGHT, "({x}, {y}) outside canvas");
        let i = (y * CANVAS_WIDTH + x) * 4;
        Rgb::new(self.rgba[i], self.rgba[i + 1], self.rgba[i + 2])
    }

    /// Take the RGBA bytes.
    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}

// 1 MB of pixels is useless in debug output
impl fmt::Debug for CanvasFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasFrame")
            .field("width", &CANVAS_WIDTH)
            .field("height", &CANVAS_HEIGHT)
            .finish_non_exhaustive()
    }
}
