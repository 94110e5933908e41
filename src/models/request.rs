use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::DocumentKind;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentRequest {
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl GenerateDocumentRequest {
    /// Returns `(document_type, details)` when both are present and non-blank.
    pub fn validate(self) -> AppResult<(String, String)> {
        match (non_blank(self.document_type), non_blank(self.details)) {
            (Some(document_type), Some(details)) => Ok((document_type, details)),
            _ => Err(AppError::missing_field(
                "Document type and details are required",
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatRequest {
    pub fn validate(self) -> AppResult<String> {
        non_blank(self.message).ok_or_else(|| AppError::missing_field("Message is required"))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A file part that passed the upload filter and is held in memory until stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub kind: DocumentKind,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(original_name: String, kind: DocumentKind, data: Bytes) -> Self {
        Self {
            original_name,
            kind,
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
