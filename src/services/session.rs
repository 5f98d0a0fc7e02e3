//! Scripted sessions for non-interactive use.
//!
//! The CLI has no pointer, so its crop flags are turned into the same
//! commands a touch screen would send.

use eink_quantize::{Algorithm, Background, Rotation, SourceImage};

use super::command::Command;
use super::pipeline::PipelineController;
use crate::error::PipelineError;

/// Crop settings given up front instead of by gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropOptions {
    pub rotation: Rotation,
    /// Zoom in percent; `None` keeps the cover-fit scale.
    pub zoom_percent: Option<u32>,
    /// Offset added after fitting, in canvas pixels.
    pub pan: Option<(f32, f32)>,
    pub background: Option<Background>,
}

impl CropOptions {
    /// Commands to apply after `StartCrop`, in order.
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some(background) = self.background {
            commands.push(Command::SetBackground(background));
        }
        let quarter_turns = self.rotation.degrees() / 90;
        for _ in 0..quarter_turns {
            commands.push(Command::Rotate);
        }
        if quarter_turns > 0 {
            commands.push(Command::Fit);
        }
        if let Some(percent) = self.zoom_percent {
            commands.push(Command::SetScale(percent as f32 / 100.0));
        }
        if let Some((dx, dy)) = self.pan {
            commands.push(Command::Pan { dx, dy });
        }
        commands
    }
}

/// Load `source`, apply `options` and run the comparison.
///
/// Leaves the controller in `Comparing` with every algorithm's frame
/// available through [`PipelineController::comparison`].
pub async fn crop_and_compare(
    controller: &mut PipelineController,
    source: SourceImage,
    options: &CropOptions,
) -> Result<(), PipelineError> {
    controller.dispatch(Command::LoadImage(source)).await?;
    controller.dispatch(Command::StartCrop).await?;
    for command in options.commands() {
        controller.dispatch(command).await?;
    }
    controller.dispatch(Command::ConfirmCrop).await
}

/// Pick `algorithm` and pack its frame, leaving the controller `Ready`.
pub async fn choose(
    controller: &mut PipelineController,
    algorithm: Algorithm,
) -> Result<(), PipelineError> {
    controller
        .dispatch(Command::SelectAlgorithm(algorithm))
        .await?;
    controller.dispatch(Command::ConfirmAlgorithm).await
}
