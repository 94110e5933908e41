use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::services::DocumentKind;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF text extraction failed: {message}")]
    Pdf { message: String },

    #[error("Extraction task aborted: {message}")]
    Aborted { message: String },
}

/// Turns a stored upload into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path, kind: DocumentKind) -> Result<String, ExtractionError>;
}

/// Extractor backed by `pdf-extract`. Word documents are accepted but not
/// parsed; they yield empty text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, path: &Path, kind: DocumentKind) -> Result<String, ExtractionError> {
        match kind {
            DocumentKind::Pdf => extract_pdf(path).await,
            DocumentKind::Doc | DocumentKind::Docx => {
                // TODO: add Word extraction once the product decides whether Word uploads stay supported.
                warn!(
                    stored_path = %path.display(),
                    mime_type = kind.mime_type(),
                    "Word extraction is not supported, returning empty content"
                );
                Ok(String::new())
            }
        }
    }
}

async fn extract_pdf(path: &Path) -> Result<String, ExtractionError> {
    let start = Instant::now();
    let owned = path.to_path_buf();

    // pdf-extract is synchronous and may panic on malformed input.
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&owned))
        .await
        .map_err(|e| ExtractionError::Aborted {
            message: e.to_string(),
        })?
        .map_err(|e| ExtractionError::Pdf {
            message: e.to_string(),
        })?;

    debug!("PDF text extraction successful, {} characters", text.len());
    info!(
        stored_path = %path.display(),
        text_length = text.len(),
        processing_time_ms = start.elapsed().as_millis() as u64,
        "PDF text extracted"
    );

    Ok(text)
}
