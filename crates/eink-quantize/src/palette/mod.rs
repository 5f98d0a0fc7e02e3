//! Palette types and nearest-color matching
//!
//! This module provides the fixed device palettes, the [`Palette`] type used
//! by every quantizer, and its validation error.

mod error;
mod palette;

pub use error::PaletteError;
pub use palette::{Palette, ACEP_7, MAX_DISTANCE_SQ, MAX_PALETTE_LEN, MONOCHROME};
