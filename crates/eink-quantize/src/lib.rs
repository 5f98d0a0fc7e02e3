#![allow(clippy::module_inception)]

//! eink-quantize: photo-to-panel pipeline for 7-color e-paper displays
//!
//! This library turns a decoded photo into the exact byte buffer a
//! 600x448 ACeP e-paper panel (addressed as a 448x600 portrait canvas)
//! expects, in three stages:
//!
//! 1. **Transform**: crop, pan, zoom and rotate the photo onto the canvas
//!    ([`TransformEngine`], [`GestureTracker`]).
//! 2. **Quantize**: reduce the canvas to palette indices with one of five
//!    algorithms ([`Algorithm`], [`Quantize`]).
//! 3. **Pack**: serialize indices two per byte ([`pack()`]).
//!
//! # Quick Start
//!
//! ```
//! use eink_quantize::{pack, Algorithm, SourceImage, TransformEngine};
//!
//! // A 2x2 photo, one red pixel
//! let rgba = vec![
//!     255, 0, 0, 255,   255, 255, 255, 255,
//!     255, 255, 255, 255,   255, 255, 255, 255,
//! ];
//! let source = SourceImage::from_rgba(2, 2, rgba).unwrap();
//!
//! let mut engine = TransformEngine::new();
//! engine.fit(&source);
//! let canvas = engine.render(&source).unwrap();
//!
//! let frame = Algorithm::FloydSteinberg.run(&canvas);
//! let packed = pack(frame.indices(), frame.width(), frame.height()).unwrap();
//! assert_eq!(packed.len(), 448 * 600 / 2);
//! ```
//!
//! # Comparing algorithms
//!
//! [`compare_all`] runs every algorithm over one canvas so the results can
//! be shown side by side. Each quantizer works on its own copy of the
//! pixels; the canvas itself is shared read-only.
//!
//! # Color model
//!
//! Matching is plain Euclidean distance over 8-bit RGB. There is no gamma
//! decoding and no perceptual color space.
//!
//! Error diffusion accumulates into an `f32` working copy that is never
//! re-clamped, so strong errors can push a channel past 0 or 255 and keep
//! influencing later pixels.
//!
//! # Wire format
//!
//! See [`pack`](mod@pack) for the nibble layout. The panel palette order is
//! fixed by the device lookup table:
//!
//! | index | color  | RGB           |
//! |-------|--------|---------------|
//! | 0     | black  | 0, 0, 0       |
//! | 1     | white  | 255, 255, 255 |
//! | 2     | green  | 0, 255, 0     |
//! | 3     | blue   | 0, 0, 255     |
//! | 4     | red    | 255, 0, 0     |
//! | 5     | yellow | 255, 255, 0   |
//! | 6     | orange | 255, 140, 0   |

pub mod color;
pub mod error;
pub mod frame;
pub mod pack;
pub mod palette;
pub mod quantize;
pub mod transform;


pub use color::Rgb;
pub use error::Error;
pub use frame::{CanvasFrame, FrameError, QuantizedFrame, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use pack::{pack, unpack, PackError, PackedBuffer};
pub use palette::{Palette, PaletteError};
pub use quantize::{
    compare_all, Algorithm, Atkinson, BlackAndWhite, FloydSteinberg, NoDither, OrderedBayer,
    ParseAlgorithmError, Quantize,
};
pub use transform::{
    Background, GestureTracker, Point, RenderError, Rotation, SourceError, SourceImage,
    TransformEngine, TransformState,
};
