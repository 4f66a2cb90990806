//! Common error types and the `AppResult` alias.
//!
//! Every failure path leaves the session's buffer untouched. The HTTP layer
//! maps each variant to a status code and a stable `kind` string so callers
//! can branch on the category instead of on message text.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

/// Input rejected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a description to generate an image.")]
    EmptyPrompt,
    #[error("image positions start at 1, got {0}")]
    InvalidPosition(usize),
    #[error("invalid image selection '{0}', expected comma-separated positions")]
    InvalidSelection(String),
}

/// Failure in either of the two outbound calls made per generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to image provider failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("prompt rejected by image provider: {message}")]
    Rejected { message: String },
    #[error("image provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("unexpected response from image provider: {0}")]
    MalformedResponse(String),
    #[error("failed to download generated image from {url}: status {status}")]
    Download { status: u16, url: String },
    #[error("generated image could not be decoded: {0}")]
    Decode(#[source] image::ImageError),
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Network(_) => "network",
            GenerationError::Rejected { .. } => "rejected",
            GenerationError::Provider { .. } => "provider",
            GenerationError::MalformedResponse(_) => "malformed_response",
            GenerationError::Download { .. } => "download",
            GenerationError::Decode(_) => "decode",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("image index {index} is out of range (buffer holds {len} images)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("An error occurred: {0}")]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("session {0} not found")]
    SessionNotFound(Uuid),
    #[error("a generation is already in progress for this session")]
    GenerationInProgress,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("No images generated.")]
    NothingGenerated,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Generation(e) => e.kind(),
            AppError::Export(ExportError::IndexOutOfRange { .. }) => "index_out_of_range",
            AppError::Export(_) => "export",
            AppError::SessionNotFound(_) => "session_not_found",
            AppError::GenerationInProgress => "generation_in_progress",
            AppError::Config(_) => "config",
            AppError::NothingGenerated => "nothing_generated",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Export(ExportError::IndexOutOfRange { .. }) => StatusCode::NOT_FOUND,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::GenerationInProgress => StatusCode::CONFLICT,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NothingGenerated => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", self);
        } else {
            tracing::debug!(kind = self.kind(), "{}", self);
        }
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_maps_to_not_found() {
        let err = AppError::from(ExportError::IndexOutOfRange { index: 3, len: 1 });
        assert_eq!(err.kind(), "index_out_of_range");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn generation_failures_keep_their_kind() {
        let err = AppError::from(GenerationError::Rejected {
            message: "Your request was rejected".to_string(),
        });
        assert_eq!(err.kind(), "rejected");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().starts_with("An error occurred: "));
    }

    #[test]
    fn empty_prompt_is_a_validation_message() {
        let err = AppError::from(ValidationError::EmptyPrompt);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "Please enter a description to generate an image.");
    }

    #[test]
    fn empty_batches_and_bad_config_are_distinct_kinds() {
        let err = AppError::NothingGenerated;
        assert_eq!(err.kind(), "nothing_generated");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::Config("x".to_string()).kind(), "config");
    }
}
