//! Raster types passed between pipeline stages.
//!
//! - [`CanvasFrame`]: the fixed-size RGBA snapshot the transform produces
//!   and every quantizer reads.
//! - [`QuantizedFrame`]: one algorithm's palette indices for that snapshot,
//!   with the palette needed to preview them.

mod canvas;
mod quantized;

pub use canvas::{CanvasFrame, FrameError, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use quantized::QuantizedFrame;
