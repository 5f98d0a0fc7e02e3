pub mod contact_sheet;
pub mod decode;
pub mod preview;

pub use contact_sheet::render_contact_sheet;
pub use decode::decode_png;
pub use preview::{encode_frame_png, encode_indexed_png, encode_packed_png};
