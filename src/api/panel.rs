use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::DisplaySpec;
use crate::rendering::encode_packed_png;
use crate::services::PanelStore;

/// Simulated panel state
#[derive(Debug, Serialize)]
pub struct PanelStatus {
    pub width: u32,
    pub height: u32,
    /// Accepted uploads since the simulator started
    pub uploads: u64,
    pub last_upload: Option<UploadInfo>,
}

/// Details of the frame currently shown
#[derive(Debug, Serialize)]
pub struct UploadInfo {
    pub sha256: String,
    pub bytes: usize,
    pub filename: Option<String>,
    pub received_at: chrono::DateTime<chrono::Utc>,
    /// Pixel count per palette index
    pub colors: Vec<usize>,
}

/// Report what the panel is showing
pub async fn handle_status(State(store): State<Arc<PanelStore>>) -> Json<PanelStatus> {
    let spec = DisplaySpec::PANEL_565;
    let last_upload = store.latest().await.map(|image| {
        let mut colors = vec![0usize; spec.colors];
        for idx in image.packed.unpack() {
            if let Some(count) = colors.get_mut(idx as usize) {
                *count += 1;
            }
        }
        UploadInfo {
            sha256: image.sha256,
            bytes: image.packed.len(),
            filename: image.filename,
            received_at: image.received_at,
            colors,
        }
    });

    Json(PanelStatus {
        width: spec.width,
        height: spec.height,
        uploads: store.upload_count(),
        last_upload,
    })
}

/// Render the shown frame as a PNG
pub async fn handle_panel_png(
    State(store): State<Arc<PanelStore>>,
) -> Result<Response, ApiError> {
    let image = store.latest().await.ok_or(ApiError::NothingUploaded)?;

    let png_bytes = tokio::task::spawn_blocking(move || encode_packed_png(&image.packed))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        png_bytes,
    )
        .into_response())
}
