//! Pointer and pinch input.
//!
//! Drag and pinch are mutually exclusive. One pointer down starts a drag,
//! two start a pinch (cancelling any drag). Lifting to fewer than two
//! pointers ends a pinch; lifting the last one ends a drag. A pinch that
//! drops to one pointer stays idle until a fresh pointer-down.

use super::engine::TransformEngine;

/// A pointer position in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// What the tracker is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        last: Point,
    },
    Pinching {
        /// Pointer spread when the pinch started; ratios are taken against it.
        initial_distance: f32,
        initial_scale: f32,
    },
}

/// Turns pointer events into [`TransformEngine`] calls.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    gesture: Gesture,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Pointers went down; `pointers` is the full set now touching.
    pub fn pointer_down(&mut self, pointers: &[Point], engine: &TransformEngine) {
        match pointers {
            [p] => self.gesture = Gesture::Dragging { last: *p },
            [a, b, ..] => {
                self.gesture = Gesture::Pinching {
                    initial_distance: a.distance(*b),
                    initial_scale: engine.state().scale(),
                }
            }
            [] => {}
        }
    }

    /// Pointers moved. Returns true if the engine changed.
    pub fn pointer_move(&mut self, pointers: &[Point], engine: &mut TransformEngine) -> bool {
        match (self.gesture, pointers) {
            (Gesture::Dragging { last }, [p]) => {
                engine.pan(p.x - last.x, p.y - last.y);
                self.gesture = Gesture::Dragging { last: *p };
                true
            }
            (Gesture::Pinching { initial_distance, .. }, [a, b, ..]) => {
                self.pinch_to(a.distance(*b) / initial_distance, engine)
            }
            _ => false,
        }
    }

    /// Pointers lifted; `remaining` is the set still touching.
    pub fn pointer_up(&mut self, remaining: &[Point]) {
        match self.gesture {
            Gesture::Pinching { .. } if remaining.len() < 2 => self.gesture = Gesture::Idle,
            Gesture::Dragging { .. } if remaining.is_empty() => self.gesture = Gesture::Idle,
            _ => {}
        }
    }

    /// Start a pinch without pointer coordinates (trackpad, zoom keys).
    /// Later updates carry the spread ratio directly.
    pub fn pinch_start(&mut self, engine: &TransformEngine) {
        self.gesture = Gesture::Pinching {
            initial_distance: 1.0,
            initial_scale: engine.state().scale(),
        };
    }

    /// Scale to `ratio` times the scale at pinch start. Returns true if the
    /// engine changed.
    pub fn pinch_update(&mut self, ratio: f32, engine: &mut TransformEngine) -> bool {
        self.pinch_to(ratio, engine)
    }

    pub fn pinch_end(&mut self) {
        if let Gesture::Pinching { .. } = self.gesture {
            self.gesture = Gesture::Idle;
        }
    }

    fn pinch_to(&mut self, ratio: f32, engine: &mut TransformEngine) -> bool {
        let Gesture::Pinching {
            initial_distance,
            initial_scale,
        } = self.gesture
        else {
            return false;
        };
        // Coincident start points give no usable ratio
        if initial_distance <= 0.0 || !ratio.is_finite() {
            return false;
        }
        engine.set_scale(initial_scale * ratio);
        true
    }

    /// Drop whatever gesture is in progress.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }
}
