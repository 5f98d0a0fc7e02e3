//! Typed inputs to the pipeline state machine.

use eink_quantize::{Algorithm, Background, Point, SourceImage};

/// Everything the user can ask the pipeline to do.
///
/// Gesture commands carry the full set of pointers currently touching, so
/// the controller never has to track individual pointer ids.
#[derive(Debug, Clone)]
pub enum Command {
    LoadImage(SourceImage),
    StartCrop,
    Pan { dx: f32, dy: f32 },
    PointerDown(Vec<Point>),
    PointerMove(Vec<Point>),
    /// Pointers still down after the lift.
    PointerUp(Vec<Point>),
    PinchStart,
    PinchUpdate { ratio: f32 },
    PinchEnd,
    SetScale(f32),
    ZoomIn,
    ZoomOut,
    Rotate,
    Fit,
    Reset,
    Center,
    SetBackground(Background),
    ConfirmCrop,
    CancelCrop,
    SelectAlgorithm(Algorithm),
    ConfirmAlgorithm,
    Upload,
    LoadNewImage,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadImage(_) => "LoadImage",
            Command::StartCrop => "StartCrop",
            Command::Pan { .. } => "Pan",
            Command::PointerDown(_) => "PointerDown",
            Command::PointerMove(_) => "PointerMove",
            Command::PointerUp(_) => "PointerUp",
            Command::PinchStart => "PinchStart",
            Command::PinchUpdate { .. } => "PinchUpdate",
            Command::PinchEnd => "PinchEnd",
            Command::SetScale(_) => "SetScale",
            Command::ZoomIn => "ZoomIn",
            Command::ZoomOut => "ZoomOut",
            Command::Rotate => "Rotate",
            Command::Fit => "Fit",
            Command::Reset => "Reset",
            Command::Center => "Center",
            Command::SetBackground(_) => "SetBackground",
            Command::ConfirmCrop => "ConfirmCrop",
            Command::CancelCrop => "CancelCrop",
            Command::SelectAlgorithm(_) => "SelectAlgorithm",
            Command::ConfirmAlgorithm => "ConfirmAlgorithm",
            Command::Upload => "Upload",
            Command::LoadNewImage => "LoadNewImage",
        }
    }

    /// Commands that only make sense while cropping.
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            Command::Pan { .. }
                | Command::PointerDown(_)
                | Command::PointerMove(_)
                | Command::PointerUp(_)
                | Command::PinchStart
                | Command::PinchUpdate { .. }
                | Command::PinchEnd
                | Command::SetScale(_)
                | Command::ZoomIn
                | Command::ZoomOut
                | Command::Rotate
                | Command::Fit
                | Command::Reset
                | Command::Center
                | Command::SetBackground(_)
        )
    }
}
