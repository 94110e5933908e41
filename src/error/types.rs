use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorBody;
use crate::services::CompletionError;

pub type AppResult<T> = Result<T, AppError>;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    MissingField { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("No files uploaded")]
    NoFilesUploaded,

    #[error("Invalid file type. Only PDF and Word documents are allowed.")]
    UnsupportedFileType { mime_type: Option<String> },

    #[error("File too large: {file_name} exceeds limit of {limit} bytes")]
    FileTooLarge { file_name: String, limit: usize },

    #[error("Request body too large: the upload exceeds the total size allowed per request")]
    RequestTooLarge,

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("{public_message}: {source}")]
    Completion {
        public_message: &'static str,
        #[source]
        source: CompletionError,
    },

    #[error("Unhandled error: {message}")]
    Unhandled { message: String },
}

/// Attached to every error response so the error middleware can decide
/// whether the internal detail reaches the client.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub detail: Option<String>,
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingField { .. } => "MISSING_FIELD",
            AppError::InvalidRequest { .. } => "INVALID_REQUEST",
            AppError::NoFilesUploaded => "NO_FILES_UPLOADED",
            AppError::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::RequestTooLarge => "REQUEST_TOO_LARGE",
            AppError::Storage { .. } => "STORAGE_ERROR",
            AppError::Completion { .. } => "COMPLETION_FAILURE",
            AppError::Unhandled { .. } => "UNHANDLED_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NoFilesUploaded => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFileType { .. } => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RequestTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Completion { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unhandled { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show any client. Server errors never leak internals here.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Storage { .. } => "Failed to process files".to_string(),
            AppError::Completion { public_message, .. } => (*public_message).to_string(),
            AppError::Unhandled { .. } => GENERIC_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Internal detail, only present for server-side failures.
    pub fn internal_detail(&self) -> Option<String> {
        match self {
            AppError::Storage { message } | AppError::Unhandled { message } => {
                Some(message.clone())
            }
            AppError::Completion { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.public_message();
        let detail = self.internal_detail();

        if status.is_server_error() {
            tracing::error!(
                error_code = error_code,
                status_code = %status,
                error_message = %self,
                "Request failed"
            );
        } else {
            tracing::warn!(
                error_code = error_code,
                status_code = %status,
                error_message = %self,
                "Request rejected"
            );
        }

        let mut response = (
            status,
            Json(ErrorBody {
                error: message.clone(),
                details: None,
            }),
        )
            .into_response();
        response
            .extensions_mut()
            .insert(ErrorReport { message, detail });
        response
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        // The body limit surfaces as a stream error; keep its status.
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::RequestTooLarge;
        }
        AppError::InvalidRequest {
            message: format!("Failed to read multipart body: {}", err.body_text()),
        }
    }
}

impl AppError {
    pub fn missing_field(message: impl Into<String>) -> Self {
        AppError::MissingField {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        AppError::Storage {
            message: message.into(),
        }
    }

    pub fn completion(public_message: &'static str, source: CompletionError) -> Self {
        AppError::Completion {
            public_message,
            source,
        }
    }
}
