//! Delivery of packed frames to the picture frame.

use async_trait::async_trait;
use futures_util::stream;
use reqwest::multipart::{Form, Part};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::TransportError;

/// Multipart field the frame's upload handler reads.
pub const UPLOAD_FIELD: &str = "file";

/// File name sent with the upload.
pub const UPLOAD_FILENAME: &str = "image.bin";

/// Bytes handed to the HTTP body per progress step.
const CHUNK_SIZE: usize = 4096;

/// Progress callback, called with 0..=100.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Sends one packed frame to the panel.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `payload`, reporting progress as it goes.
    ///
    /// Returns once the panel has accepted or refused the frame.
    async fn upload(&self, payload: Vec<u8>, progress: ProgressFn) -> Result<(), TransportError>;
}

/// Posts frames as `multipart/form-data` to the frame's HTTP endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Percentage of `sent` out of `total`, rounded down.
fn percent(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (sent * 100 / total) as u8
}

#[async_trait]
impl Transport for HttpTransport {
    async fn upload(&self, payload: Vec<u8>, progress: ProgressFn) -> Result<(), TransportError> {
        let total = payload.len();
        tracing::info!(url = %self.url, bytes = total, "Uploading frame");
        progress(0);

        // Report progress as the body is pulled, skipping repeats. 100 is
        // held back until the frame answers.
        let last = Arc::new(AtomicU8::new(0));
        let chunks: Vec<Vec<u8>> = payload.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let mut sent = 0usize;
        let reporter = progress.clone();
        let reported = last.clone();
        let body = stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len();
            let pct = percent(sent, total).min(99);
            if last.swap(pct, Ordering::Relaxed) != pct {
                reporter(pct);
            }
            Ok::<_, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(body), total as u64)
            .file_name(UPLOAD_FILENAME)
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(url = %self.url, status = status.as_u16(), "Frame refused upload");
            return Err(TransportError::Status(status.as_u16()));
        }

        if reported.swap(100, Ordering::Relaxed) != 100 {
            progress(100);
        }
        tracing::info!(url = %self.url, "Upload complete");
        Ok(())
    }
}
