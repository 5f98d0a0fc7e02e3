pub mod panel;
pub mod upload;

pub use panel::{handle_panel_png, handle_status, PanelStatus, UploadInfo};
pub use upload::handle_upload;
