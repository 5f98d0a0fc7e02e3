//! Crop, pan, zoom and rotate a source photo onto the fixed canvas.
//!
//! [`TransformEngine`] owns a [`TransformState`] and renders a
//! [`CanvasFrame`](crate::CanvasFrame) from a [`SourceImage`].
//! [`GestureTracker`] turns raw pointer input into engine calls.
//!
//! # Coordinate model
//!
//! A source pixel `p` lands on the canvas at
//!
//! ```text
//! rotate_about(canvas_center, rotation) ( offset + scale * p )
//! ```
//!
//! Offsets are in canvas pixels and describe where the unrotated, scaled
//! image's top-left corner sits before rotation. Zoom keeps the canvas
//! center fixed; rotation turns around it.

mod engine;
mod gesture;
mod source;
mod state;

pub use engine::{RenderError, TransformEngine, ZOOM_STEP_PERCENT};
pub use gesture::{Gesture, GestureTracker, Point};
pub use source::{SourceError, SourceImage};
pub use state::{Background, ParseBackgroundError, Rotation, TransformState, MAX_SCALE, MIN_SCALE};
