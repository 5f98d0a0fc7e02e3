use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eink_quantize::{PackError, SourceError};
use serde_json::json;
use thiserror::Error;

/// Error from [`PipelineController::dispatch`](crate::services::PipelineController::dispatch)
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input rejected: {0}")]
    InputRejected(#[from] InputRejected),

    #[error("Upload failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Render error: {0}")]
    Render(#[from] eink_quantize::RenderError),

    #[error("Pack error: {0}")]
    Pack(#[from] PackError),
}

/// A command or input the pipeline refused. Nothing changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputRejected {
    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("Invalid image: {0}")]
    InvalidImage(#[from] SourceError),

    #[error("No algorithm selected")]
    NoAlgorithmSelected,

    #[error("Upload already in progress")]
    UploadInProgress,

    #[error("Command {command} is not valid while {state}")]
    UnexpectedCommand {
        command: &'static str,
        state: &'static str,
    },
}

/// Failure talking to the panel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("Device returned HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else if e.is_builder() {
            TransportError::Request(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

/// Errors from PNG encoding and panel buffer checks
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("Wrong buffer size: {size} bytes (expected {expected})")]
    WrongBufferSize { size: usize, expected: usize },
}

/// Errors returned by the panel simulator's HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(#[from] ImageError),

    #[error("Nothing uploaded yet")]
    NothingUploaded,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::InvalidUpload(ImageError::WrongBufferSize { .. }) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::InvalidUpload(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::NothingUploaded => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_rejected_unexpected_command() {
        let error = InputRejected::UnexpectedCommand {
            command: "Upload",
            state: "Idle",
        };
        assert_eq!(error.to_string(), "Command Upload is not valid while Idle");
    }

    #[test]
    fn test_input_rejected_invalid_image() {
        let error: InputRejected = SourceError::Empty {
            width: 0,
            height: 3,
        }
        .into();
        assert_eq!(error.to_string(), "Invalid image: image has no pixels (0x3)");
    }

    #[test]
    fn test_pipeline_error_wraps_transport() {
        let error: PipelineError = TransportError::Status(500).into();
        assert_eq!(error.to_string(), "Upload failed: Device returned HTTP 500");
    }

    #[test]
    fn test_image_error_wrong_buffer_size() {
        let error = ImageError::WrongBufferSize {
            size: 10,
            expected: 134_400,
        };
        assert_eq!(
            error.to_string(),
            "Wrong buffer size: 10 bytes (expected 134400)"
        );
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        let response = ApiError::BadRequest("no file".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::InvalidUpload(ImageError::WrongBufferSize {
            size: 1,
            expected: 2,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            ApiError::InvalidUpload(ImageError::PngEncode("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::NothingUploaded.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
