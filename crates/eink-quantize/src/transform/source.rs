//! Decoded source photo.

use std::fmt;

use tiny_skia::{IntSize, Pixmap};

/// Error returned when a raster cannot be used as a source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Width or height is zero.
    Empty { width: u32, height: u32 },
    /// Buffer length is not `width * height * 4`.
    WrongLength { expected: usize, actual: usize },
    /// Dimensions exceed what the renderer can address.
    TooLarge { width: u32, height: u32 },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Empty { width, height } => {
                write!(f, "image has no pixels ({}x{})", width, height)
            }
            SourceError::WrongLength { expected, actual } => write!(
                f,
                "RGBA buffer has {} bytes, expected {}",
                actual, expected
            ),
            SourceError::TooLarge { width, height } => {
                write!(f, "image too large ({}x{})", width, height)
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// An immutable RGBA photo ready to be rendered onto the canvas.
///
/// The pixels are premultiplied once on construction, so re-rendering on
/// every gesture does not touch the source bytes again.
#[derive(Clone)]
pub struct SourceImage {
    pixmap: Pixmap,
}

impl SourceImage {
    /// Validate and take ownership of straight (non-premultiplied) RGBA.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Empty`] if either dimension is zero
    /// - [`SourceError::WrongLength`] if `rgba.len() != width * height * 4`
    /// - [`SourceError::TooLarge`] if the renderer cannot hold the image
    pub fn from_rgba(width: u32, height: u32, mut rgba: Vec<u8>) -> Result<Self, SourceError> {
        if width == 0 || height == 0 {
            return Err(SourceError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SourceError::WrongLength {
                expected,
                actual: rgba.len(),
            });
        }

        for px in rgba.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a < 255 {
                px[0] = premultiply(px[0], a);
                px[1] = premultiply(px[1], a);
                px[2] = premultiply(px[2], a);
            }
        }

        let pixmap = IntSize::from_wh(width, height)
            .and_then(|size| Pixmap::from_vec(rgba, size))
            .ok_or(SourceError::TooLarge { width, height })?;
        Ok(Self { pixmap })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

#[inline]
fn premultiply(c: u8, a: u16) -> u8 {
    ((c as u16 * a + 127) / 255) as u8
}
