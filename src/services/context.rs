//! Session data owned by the pipeline controller.

use eink_quantize::{
    Algorithm, Background, CanvasFrame, GestureTracker, PackedBuffer, QuantizedFrame,
    SourceImage, TransformEngine,
};

/// All state of one photo session.
///
/// Owned by exactly one [`PipelineController`](super::PipelineController);
/// the state enum decides which of these fields are meaningful.
#[derive(Debug, Default)]
pub struct PipelineContext {
    pub source: Option<SourceImage>,
    pub engine: TransformEngine,
    pub gestures: GestureTracker,
    /// Background the next crop starts with.
    pub background: Background,
    pub canvas: Option<CanvasFrame>,
    pub comparison: Vec<QuantizedFrame>,
    pub selected: Option<Algorithm>,
    pub chosen: Option<QuantizedFrame>,
    pub packed: Option<PackedBuffer>,
}

impl PipelineContext {
    pub fn new(background: Background) -> Self {
        Self {
            background,
            engine: TransformEngine::with_background(background),
            ..Self::default()
        }
    }

    /// Frame for `algorithm` from the comparison set.
    pub fn comparison_frame(&self, algorithm: Algorithm) -> Option<&QuantizedFrame> {
        self.comparison.iter().find(|f| f.algorithm() == algorithm)
    }
}
