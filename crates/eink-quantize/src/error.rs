//! Unified error type for the eink-quantize public API.
//!
//! [`Error`] wraps every error type in the crate into a single enum for
//! convenient `?` propagation in application code.

use std::fmt;

use crate::frame::FrameError;
use crate::pack::PackError;
use crate::palette::PaletteError;
use crate::transform::{RenderError, SourceError};

/// Unified error type for the eink-quantize public API.
///
/// # Example
///
/// ```
/// use eink_quantize::{pack, Error, SourceImage, TransformEngine};
///
/// fn convert(width: u32, height: u32, rgba: Vec<u8>) -> Result<Vec<u8>, Error> {
///     let source = SourceImage::from_rgba(width, height, rgba)?;
///     let mut engine = TransformEngine::new();
///     engine.fit(&source);
///     let canvas = engine.render(&source)?;
///     let frame = eink_quantize::Algorithm::NoDither.run(&canvas);
///     Ok(pack(frame.indices(), frame.width(), frame.height())?.into_vec())
/// }
///
/// assert_eq!(convert(1, 1, vec![255, 0, 0, 255]).unwrap().len(), 134_400);
/// assert!(matches!(convert(0, 1, vec![]), Err(Error::Source(_))));
/// ```
#[derive(Debug)]
pub enum Error {
    /// Palette validation error
    Palette(PaletteError),
    /// Source raster rejected
    Source(SourceError),
    /// Canvas buffer rejected
    Frame(FrameError),
    /// Canvas could not be rendered
    Render(RenderError),
    /// Indices could not be packed
    Pack(PackError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Palette(err) => write!(f, "palette error: {}", err),
            Error::Source(err) => write!(f, "invalid source image: {}", err),
            Error::Frame(err) => write!(f, "invalid canvas: {}", err),
            Error::Render(err) => write!(f, "render error: {}", err),
            Error::Pack(err) => write!(f, "pack error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Palette(err) => Some(err),
            Error::Source(err) => Some(err),
            Error::Frame(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Pack(err) => Some(err),
        }
    }
}

impl From<PaletteError> for Error {
    fn from(err: PaletteError) -> Self {
        Error::Palette(err)
    }
}

impl From<SourceError> for Error {
    fn from(err: SourceError) -> Self {
        Error::Source(err)
    }
}

impl From<FrameError> for Error {
    fn from(err: FrameError) -> Self {
        Error::Frame(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Error::Render(err)
    }
}

impl From<PackError> for Error {
    fn from(err: PackError) -> Self {
        Error::Pack(err)
    }
}
