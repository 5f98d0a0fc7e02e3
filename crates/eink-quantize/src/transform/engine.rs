//! Transform state machine and canvas renderer.

use std::fmt;

use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use super::source::SourceImage;
use super::state::{Background, TransformState, MAX_SCALE, MIN_SCALE};
use crate::frame::{CanvasFrame, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Step of the zoom buttons, in percent.
pub const ZOOM_STEP_PERCENT: i32 = 10;

const CENTER_X: f32 = CANVAS_WIDTH as f32 / 2.0;
const CENTER_Y: f32 = CANVAS_HEIGHT as f32 / 2.0;

/// Error returned when the canvas cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The canvas pixmap could not be allocated.
    Allocation,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Allocation => write!(
                f,
                "failed to allocate {}x{} canvas",
                CANVAS_WIDTH, CANVAS_HEIGHT
            ),
        }
    }
}

impl std::error::Error for RenderError {}

/// Interactive crop/zoom/rotate over a [`TransformState`].
///
/// Every operation is O(1) except [`render`](Self::render), which is
/// O(canvas) and cheap enough to call after every gesture step.
///
/// # Example
///
/// ```
/// use eink_quantize::{SourceImage, TransformEngine};
///
/// let source = SourceImage::from_rgba(896, 1200, vec![255; 896 * 1200 * 4]).unwrap();
/// let mut engine = TransformEngine::new();
/// engine.fit(&source);
/// assert_eq!(engine.state().scale(), 0.5);
/// assert_eq!(engine.state().offset(), (0.0, 0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    state: TransformState,
}

impl TransformEngine {
    /// Engine at scale 1, no offset, no rotation, white background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with the given background and otherwise default state.
    pub fn with_background(background: Background) -> Self {
        let mut engine = Self::new();
        engine.state.background = background;
        engine
    }

    #[inline]
    pub fn state(&self) -> &TransformState {
        &self.state
    }

    /// Set the scale, clamped to `MIN_SCALE..=MAX_SCALE`, keeping the
    /// source point under the canvas center where it is. Non-finite input
    /// is ignored.
    pub fn set_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            return;
        }
        let new = scale.clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new / self.state.scale;
        self.state.offset_x = CENTER_X - (CENTER_X - self.state.offset_x) * ratio;
        self.state.offset_y = CENTER_Y - (CENTER_Y - self.state.offset_y) * ratio;
        self.state.scale = new;
    }

    /// Current scale as a whole percentage, as shown on the zoom slider.
    pub fn zoom_percent(&self) -> i32 {
        (self.state.scale * 100.0).round() as i32
    }

    /// Zoom in one step (+10%), up to 300%.
    pub fn zoom_in(&mut self) {
        self.step_zoom(ZOOM_STEP_PERCENT);
    }

    /// Zoom out one step (-10%), down to 10%.
    pub fn zoom_out(&mut self) {
        self.step_zoom(-ZOOM_STEP_PERCENT);
    }

    fn step_zoom(&mut self, delta: i32) {
        let min = (MIN_SCALE * 100.0).round() as i32;
        let max = (MAX_SCALE * 100.0).round() as i32;
        let percent = (self.zoom_percent() + delta).clamp(min, max);
        self.set_scale(percent as f32 / 100.0);
    }

    /// Rotate a quarter turn clockwise about the canvas center.
    pub fn rotate(&mut self) {
        self.state.rotation = self.state.rotation.next();
    }

    /// Cover-fit: the smallest scale at which the (possibly rotated) source
    /// covers the whole canvas, centered.
    ///
    /// The scale is not clamped, so very large or very small sources still
    /// cover exactly. Applying `fit` twice changes nothing.
    pub fn fit(&mut self, source: &SourceImage) {
        let (w, h) = (source.width() as f32, source.height() as f32);
        let (eff_w, eff_h) = if self.state.rotation.is_sideways() {
            (h, w)
        } else {
            (w, h)
        };
        self.state.scale = (CANVAS_WIDTH as f32 / eff_w).max(CANVAS_HEIGHT as f32 / eff_h);
        self.center(source);
    }

    /// Center the unrotated scaled source on the canvas, keeping the scale.
    pub fn center(&mut self, source: &SourceImage) {
        let s = self.state.scale;
        self.state.offset_x = (CANVAS_WIDTH as f32 - source.width() as f32 * s) / 2.0;
        self.state.offset_y = (CANVAS_HEIGHT as f32 - source.height() as f32 * s) / 2.0;
    }

    /// Back to scale 1, no offset, no rotation. Background is kept.
    pub fn reset(&mut self) {
        self.state = TransformState {
            background: self.state.background,
            ..TransformState::default()
        };
    }

    /// Move the image by a canvas-space delta. Not clamped; non-finite
    /// deltas are ignored.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.state.offset_x += dx;
        self.state.offset_y += dy;
    }

    pub fn set_background(&mut self, background: Background) {
        self.state.background = background;
    }

    /// The affine map from source pixels to canvas pixels.
    pub fn transform(&self) -> Transform {
        let s = &self.state;
        Transform::from_rotate_at(s.rotation.degrees() as f32, CENTER_X, CENTER_Y)
            .pre_translate(s.offset_x, s.offset_y)
            .pre_scale(s.scale, s.scale)
    }

    /// Draw `source` onto a background-filled canvas with bilinear
    /// resampling.
    pub fn render(&self, source: &SourceImage) -> Result<CanvasFrame, RenderError> {
        let mut pixmap = Pixmap::new(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32)
            .ok_or(RenderError::Allocation)?;

        let bg = self.state.background.color();
        pixmap.fill(Color::from_rgba8(bg.r, bg.g, bg.b, 255));

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        pixmap.draw_pixmap(0, 0, source.pixmap().as_ref(), &paint, self.transform(), None);

        let mut rgba = Vec::with_capacity(CanvasFrame::LEN);
        for px in pixmap.pixels() {
            let c = px.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        // Length is fixed by construction
        CanvasFrame::from_rgba(rgba).map_err(|_| RenderError::Allocation)
    }
}
