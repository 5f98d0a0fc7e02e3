use eink_quantize::PackedBuffer;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A frame the simulated panel accepted
#[derive(Debug, Clone)]
pub struct ReceivedImage {
    /// The packed buffer exactly as uploaded
    pub packed: PackedBuffer,
    /// Hex SHA-256 of the uploaded bytes
    pub sha256: String,
    /// File name sent with the multipart part, if any
    pub filename: Option<String>,
    /// When the upload finished
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl ReceivedImage {
    pub fn new(packed: PackedBuffer, filename: Option<String>) -> Self {
        let sha256 = hex::encode(Sha256::digest(packed.as_bytes()));
        Self {
            packed,
            sha256,
            filename,
            received_at: chrono::Utc::now(),
        }
    }
}

/// What the simulated panel is currently showing
pub struct PanelStore {
    current: Arc<RwLock<Option<ReceivedImage>>>,
    uploads: AtomicU64,
}

impl PanelStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            uploads: AtomicU64::new(0),
        }
    }

    /// Replace the displayed frame
    pub async fn store(&self, image: ReceivedImage) {
        let mut current = self.current.write().await;
        *current = Some(image);
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    /// The most recent frame, if anything was uploaded
    pub async fn latest(&self) -> Option<ReceivedImage> {
        self.current.read().await.clone()
    }

    /// Number of accepted uploads since start
    pub fn upload_count(&self) -> u64 {
        self.uploads.load(Ordering::Relaxed)
    }
}

impl Default for PanelStore {
    fn default() -> Self {
        Self::new()
    }
}
