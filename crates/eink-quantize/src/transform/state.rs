//! Transform parameters.

use std::fmt;
use std::str::FromStr;

use crate::color::Rgb;

/// Smallest scale reachable through zoom (10%).
pub const MIN_SCALE: f32 = 0.1;

/// Largest scale reachable through zoom (300%).
pub const MAX_SCALE: f32 = 3.0;

/// Quarter-turn rotation of the source about the canvas center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// The next quarter turn clockwise.
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotation for a multiple of 90 degrees (negative and >= 360 wrap).
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(match degrees.rem_euclid(360) {
            0 => Rotation::Deg0,
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            _ => Rotation::Deg270,
        })
    }

    /// True for 90 and 270, where source width and height trade places.
    pub fn is_sideways(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Fill color for canvas areas the source does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Background {
    #[default]
    White,
    Black,
}

impl Background {
    pub fn color(self) -> Rgb {
        match self {
            Background::White => Rgb::WHITE,
            Background::Black => Rgb::BLACK,
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Background::White => "white",
            Background::Black => "black",
        })
    }
}

/// Error returned when a background name is neither `white` nor `black`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBackgroundError(pub String);

impl fmt::Display for ParseBackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown background '{}' (expected white or black)", self.0)
    }
}

impl std::error::Error for ParseBackgroundError {}

impl FromStr for Background {
    type Err = ParseBackgroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(Background::White),
            "black" => Ok(Background::Black),
            _ => Err(ParseBackgroundError(s.to_string())),
        }
    }
}

/// Crop and orientation of the source on the canvas.
///
/// Mutated only through [`TransformEngine`](super::TransformEngine), which
/// keeps zoomed scales inside `MIN_SCALE..=MAX_SCALE`. A cover-fit may
/// leave the scale outside that range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub(crate) scale: f32,
    pub(crate) offset_x: f32,
    pub(crate) offset_y: f32,
    pub(crate) rotation: Rotation,
    pub(crate) background: Background,
}

impl TransformState {
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Canvas-space position of the unrotated image's top-left corner.
    #[inline]
    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[inline]
    pub fn background(&self) -> Background {
        self.background
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: Rotation::Deg0,
            background: Background::White,
        }
    }
}
