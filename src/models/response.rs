use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateDocumentResponse {
    pub document: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub status: String,
}

impl ChatResponse {
    pub fn success(response: String) -> Self {
        Self {
            response,
            status: "success".to_string(),
        }
    }
}

/// Outcome for one file of an upload batch. Exactly one of `content` or `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFileResult {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessedFileResult {
    pub fn extracted(filename: String, content: String, size: usize) -> Self {
        Self {
            filename,
            content: Some(content),
            size: Some(size),
            error: None,
        }
    }

    pub fn failed(filename: String, error: String) -> Self {
        Self {
            filename,
            content: None,
            size: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub processed_files: Vec<ProcessedFileResult>,
}

impl UploadResponse {
    pub fn new(processed_files: Vec<ProcessedFileResult>) -> Self {
        Self {
            success: true,
            message: "Files processed successfully".to_string(),
            processed_files,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub mode: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
