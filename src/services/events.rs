//! Notifications emitted by the pipeline controller.

use eink_quantize::Algorithm;

use super::pipeline::PipelineState;

/// Something observable happened in the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StateChanged {
        from: PipelineState,
        to: PipelineState,
    },
    /// Comparison started; results follow after one scheduler yield.
    Processing,
    /// Every algorithm has a frame ready for side-by-side display.
    ComparisonReady(Vec<Algorithm>),
    /// Upload progress, 0 to 100.
    UploadProgress(u8),
    UploadSucceeded,
    UploadFailed(String),
}
