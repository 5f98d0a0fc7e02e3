pub mod command;
pub mod context;
pub mod events;
pub mod panel_store;
pub mod pipeline;
pub mod session;
pub mod transport;

pub use command::Command;
pub use context::PipelineContext;
pub use events::PipelineEvent;
pub use panel_store::{PanelStore, ReceivedImage};
pub use pipeline::{PipelineController, PipelineState};
pub use session::{choose, crop_and_compare, CropOptions};
pub use transport::{HttpTransport, ProgressFn, Transport, UPLOAD_FIELD, UPLOAD_FILENAME};
