use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
};
use eink_quantize::PackedBuffer;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::DisplaySpec;
use crate::services::{PanelStore, ReceivedImage, UPLOAD_FIELD};

/// Accept a packed frame the way the picture frame does
///
/// Reads the multipart field `file`, checks it is exactly one packed
/// 448x600 frame and replaces what the panel shows. Answers plain `OK`.
pub async fn handle_upload(
    State(store): State<Arc<PanelStore>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let spec = DisplaySpec::PANEL_565;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        if let Err(e) = spec.validate_size(bytes.len()) {
            tracing::warn!(size = bytes.len(), expected = spec.packed_len(), "Rejected upload");
            return Err(e.into());
        }

        let packed =
            PackedBuffer::from_bytes(bytes.to_vec(), spec.width as usize, spec.height as usize)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
        let image = ReceivedImage::new(packed, filename);
        tracing::info!(
            sha256 = %image.sha256,
            filename = ?image.filename,
            "Frame received"
        );
        store.store(image).await;

        return Ok("OK");
    }

    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}
