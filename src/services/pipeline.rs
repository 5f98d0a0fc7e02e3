//! The photo pipeline state machine.
//!
//! ```text
//! Idle -> ImageLoaded -> Cropping -> Comparing -> Ready(alg)
//!                           |                       |
//!                           +-> Idle (cancel)       v
//!                                           Uploading(alg) -> Done(alg) | Failed(alg)
//! ```
//!
//! `LoadNewImage` returns to `Idle` from anywhere. Every input goes through
//! [`PipelineController::dispatch`]; a command that does not fit the current
//! state is rejected and changes nothing.

use std::fmt;
use std::sync::Arc;

use eink_quantize::{
    compare_all, pack, Algorithm, Background, CanvasFrame, GestureTracker, PackedBuffer,
    QuantizedFrame, SourceImage, TransformEngine, TransformState,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::command::Command;
use super::context::PipelineContext;
use super::events::PipelineEvent;
use super::transport::{ProgressFn, Transport};
use crate::error::{InputRejected, PipelineError};

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ImageLoaded,
    Cropping,
    Comparing,
    Ready(Algorithm),
    Uploading(Algorithm),
    Done(Algorithm),
    Failed(Algorithm),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::ImageLoaded => "ImageLoaded",
            PipelineState::Cropping => "Cropping",
            PipelineState::Comparing => "Comparing",
            PipelineState::Ready(_) => "Ready",
            PipelineState::Uploading(_) => "Uploading",
            PipelineState::Done(_) => "Done",
            PipelineState::Failed(_) => "Failed",
        }
    }

    /// The chosen algorithm, once there is one.
    pub fn algorithm(&self) -> Option<Algorithm> {
        match self {
            PipelineState::Ready(a)
            | PipelineState::Uploading(a)
            | PipelineState::Done(a)
            | PipelineState::Failed(a) => Some(*a),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.algorithm() {
            Some(a) => write!(f, "{}({})", self.name(), a.slug()),
            None => f.write_str(self.name()),
        }
    }
}

/// Drives one photo from load to upload.
///
/// Holds the whole session in a single [`PipelineContext`]; nothing is
/// shared, so `&mut self` is the only synchronization needed.
pub struct PipelineController {
    state: PipelineState,
    ctx: PipelineContext,
    default_background: Background,
    transport: Arc<dyn Transport>,
    events: Option<UnboundedSender<PipelineEvent>>,
}

impl PipelineController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_background(transport, Background::White)
    }

    /// Controller whose crops start on `background`.
    pub fn with_background(transport: Arc<dyn Transport>, background: Background) -> Self {
        Self {
            state: PipelineState::Idle,
            ctx: PipelineContext::new(background),
            default_background: background,
            transport,
            events: None,
        }
    }

    /// Receive [`PipelineEvent`]s from now on. Replaces any earlier subscriber.
    pub fn subscribe(&mut self) -> UnboundedReceiver<PipelineEvent> {
        let (tx, rx) = unbounded_channel();
        self.events = Some(tx);
        rx
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Current crop parameters.
    pub fn transform(&self) -> &TransformState {
        self.ctx.engine.state()
    }

    /// Current zoom as shown on the slider.
    pub fn zoom_percent(&self) -> i32 {
        self.ctx.engine.zoom_percent()
    }

    /// Render the crop as it stands, for live preview while cropping.
    pub fn preview(&self) -> Result<Option<CanvasFrame>, PipelineError> {
        match (self.state, &self.ctx.source) {
            (PipelineState::Cropping, Some(source)) => Ok(Some(self.ctx.engine.render(source)?)),
            _ => Ok(None),
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.ctx.source.as_ref()
    }

    /// The canvas frozen at crop confirmation.
    pub fn canvas(&self) -> Option<&CanvasFrame> {
        self.ctx.canvas.as_ref()
    }

    /// Frames for side-by-side comparison (empty outside `Comparing`).
    pub fn comparison(&self) -> &[QuantizedFrame] {
        &self.ctx.comparison
    }

    pub fn selected(&self) -> Option<Algorithm> {
        self.ctx.selected
    }

    /// The frame that was confirmed for upload.
    pub fn chosen(&self) -> Option<&QuantizedFrame> {
        self.ctx.chosen.as_ref()
    }

    pub fn packed(&self) -> Option<&PackedBuffer> {
        self.ctx.packed.as_ref()
    }

    /// Apply one command.
    ///
    /// Rejections leave the state and the session untouched. A transport
    /// failure still moves the state to `Failed` before the error returns,
    /// and so does dropping the future while an upload is in flight.
    pub async fn dispatch(&mut self, command: Command) -> Result<(), PipelineError> {
        tracing::debug!(command = command.name(), state = %self.state, "Dispatch");

        match (self.state, command) {
            (_, Command::LoadNewImage) => {
                self.ctx = PipelineContext::new(self.default_background);
                self.transition(PipelineState::Idle);
                Ok(())
            }

            (PipelineState::Idle, Command::LoadImage(source)) => {
                tracing::info!(
                    width = source.width(),
                    height = source.height(),
                    "Image loaded"
                );
                self.ctx.source = Some(source);
                self.transition(PipelineState::ImageLoaded);
                Ok(())
            }

            (PipelineState::ImageLoaded, Command::StartCrop) => {
                self.ctx.engine = TransformEngine::with_background(self.ctx.background);
                self.ctx.gestures = GestureTracker::new();
                if let Some(source) = &self.ctx.source {
                    self.ctx.engine.fit(source);
                }
                self.transition(PipelineState::Cropping);
                Ok(())
            }

            (PipelineState::Cropping, command) if command.is_transform() => {
                self.apply_transform(command);
                Ok(())
            }

            (PipelineState::Cropping, Command::ConfirmCrop) => self.confirm_crop().await,

            (PipelineState::Cropping, Command::CancelCrop) => {
                self.ctx = PipelineContext::new(self.default_background);
                self.transition(PipelineState::Idle);
                Ok(())
            }

            (PipelineState::Comparing, Command::SelectAlgorithm(algorithm)) => {
                tracing::debug!(algorithm = %algorithm, "Algorithm selected");
                self.ctx.selected = Some(algorithm);
                Ok(())
            }

            (PipelineState::Comparing, Command::ConfirmAlgorithm) => self.confirm_algorithm(),

            (
                PipelineState::Ready(algorithm)
                | PipelineState::Done(algorithm)
                | PipelineState::Failed(algorithm),
                Command::Upload,
            ) => self.upload(algorithm).await,

            (PipelineState::Uploading(_), Command::Upload) => {
                Err(InputRejected::UploadInProgress.into())
            }

            (state, command) => {
                tracing::debug!(command = command.name(), state = %state, "Command rejected");
                Err(InputRejected::UnexpectedCommand {
                    command: command.name(),
                    state: state.name(),
                }
                .into())
            }
        }
    }

    fn apply_transform(&mut self, command: Command) {
        let engine = &mut self.ctx.engine;
        let gestures = &mut self.ctx.gestures;
        match command {
            Command::Pan { dx, dy } => engine.pan(dx, dy),
            Command::PointerDown(points) => gestures.pointer_down(&points, engine),
            Command::PointerMove(points) => {
                gestures.pointer_move(&points, engine);
            }
            Command::PointerUp(remaining) => gestures.pointer_up(&remaining),
            Command::PinchStart => gestures.pinch_start(engine),
            Command::PinchUpdate { ratio } => {
                gestures.pinch_update(ratio, engine);
            }
            Command::PinchEnd => gestures.pinch_end(),
            Command::SetScale(scale) => engine.set_scale(scale),
            Command::ZoomIn => engine.zoom_in(),
            Command::ZoomOut => engine.zoom_out(),
            Command::Rotate => engine.rotate(),
            Command::Fit => {
                if let Some(source) = &self.ctx.source {
                    engine.fit(source);
                }
            }
            Command::Reset => engine.reset(),
            Command::Center => {
                if let Some(source) = &self.ctx.source {
                    engine.center(source);
                }
            }
            Command::SetBackground(background) => {
                engine.set_background(background);
                self.ctx.background = background;
            }
            _ => {}
        }
    }

    async fn confirm_crop(&mut self) -> Result<(), PipelineError> {
        let Some(source) = &self.ctx.source else {
            return Err(InputRejected::UnexpectedCommand {
                command: "ConfirmCrop",
                state: self.state.name(),
            }
            .into());
        };
        let canvas = self.ctx.engine.render(source)?;

        self.emit(PipelineEvent::Processing);
        // Let subscribers see Processing before the CPU-bound work starts.
        // Dropped here, the controller is still Cropping.
        tokio::task::yield_now().await;

        let started = std::time::Instant::now();
        let frames = compare_all(&canvas);
        tracing::info!(
            algorithms = frames.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Comparison ready"
        );

        let algorithms: Vec<Algorithm> = frames.iter().map(|f| f.algorithm()).collect();
        self.ctx.gestures.cancel();
        self.ctx.canvas = Some(canvas);
        self.ctx.comparison = frames;
        self.ctx.selected = None;
        self.transition(PipelineState::Comparing);
        self.emit(PipelineEvent::ComparisonReady(algorithms));
        Ok(())
    }

    fn confirm_algorithm(&mut self) -> Result<(), PipelineError> {
        let algorithm = self
            .ctx
            .selected
            .ok_or(InputRejected::NoAlgorithmSelected)?;
        let Some(frame) = self.ctx.comparison_frame(algorithm) else {
            return Err(InputRejected::NoAlgorithmSelected.into());
        };

        let packed = pack(frame.indices(), frame.width(), frame.height())?;
        tracing::info!(algorithm = %algorithm, bytes = packed.len(), "Frame packed");

        let chosen = self
            .ctx
            .comparison
            .drain(..)
            .find(|f| f.algorithm() == algorithm);
        self.ctx.chosen = chosen;
        self.ctx.packed = Some(packed);
        self.transition(PipelineState::Ready(algorithm));
        Ok(())
    }

    async fn upload(&mut self, algorithm: Algorithm) -> Result<(), PipelineError> {
        let Some(packed) = &self.ctx.packed else {
            return Err(InputRejected::UnexpectedCommand {
                command: "Upload",
                state: self.state.name(),
            }
            .into());
        };
        let payload = packed.as_bytes().to_vec();
        self.transition(PipelineState::Uploading(algorithm));

        let events = self.events.clone();
        let progress: ProgressFn = Arc::new(move |pct| {
            if let Some(tx) = &events {
                let _ = tx.send(PipelineEvent::UploadProgress(pct));
            }
        });

        let transport = Arc::clone(&self.transport);
        let guard = UploadGuard {
            state: &mut self.state,
            events: self.events.clone(),
            algorithm,
            armed: true,
        };
        let result = transport.upload(payload, progress).await;
        guard.disarm();

        match result {
            Ok(()) => {
                self.transition(PipelineState::Done(algorithm));
                self.emit(PipelineEvent::UploadSucceeded);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%e, "Upload failed");
                self.transition(PipelineState::Failed(algorithm));
                self.emit(PipelineEvent::UploadFailed(e.to_string()));
                Err(e.into())
            }
        }
    }

    fn transition(&mut self, to: PipelineState) {
        let from = self.state;
        self.state = to;
        if from != to {
            tracing::debug!(from = %from, to = %to, "State changed");
            self.emit(PipelineEvent::StateChanged { from, to });
        }
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver just means nobody is listening
            let _ = tx.send(event);
        }
    }
}

/// Moves an abandoned upload to `Failed` so it can be retried.
///
/// Lives across the transport await; if the `dispatch` future is dropped
/// there, `Drop` runs and the packed buffer stays available.
struct UploadGuard<'a> {
    state: &'a mut PipelineState,
    events: Option<UnboundedSender<PipelineEvent>>,
    algorithm: Algorithm,
    armed: bool,
}

impl UploadGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let from = *self.state;
        let to = PipelineState::Failed(self.algorithm);
        *self.state = to;
        tracing::warn!(algorithm = %self.algorithm, "Upload abandoned");
        if let Some(tx) = &self.events {
            let _ = tx.send(PipelineEvent::StateChanged { from, to });
            let _ = tx.send(PipelineEvent::UploadFailed("upload cancelled".to_string()));
        }
    }
}
