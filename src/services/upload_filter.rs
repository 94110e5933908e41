use tracing::debug;

use crate::error::{AppError, AppResult};

pub const PDF_MIME: &str = "application/pdf";
pub const DOC_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Document types accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
}

impl DocumentKind {
    /// Parses a declared Content-Type, ignoring parameters and case.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => Some(DocumentKind::Pdf),
            DOC_MIME => Some(DocumentKind::Doc),
            DOCX_MIME => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Doc => DOC_MIME,
            DocumentKind::Docx => DOCX_MIME,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Doc => "doc",
            DocumentKind::Docx => "docx",
        }
    }
}

/// Pure accept/reject checks applied to each file part before anything touches disk.
#[derive(Debug, Clone, Copy)]
pub struct UploadFilter {
    max_size_bytes: usize,
}

impl UploadFilter {
    pub fn new(max_size_bytes: usize) -> Self {
        Self { max_size_bytes }
    }

    pub fn check_type(&self, content_type: Option<&str>) -> AppResult<DocumentKind> {
        content_type
            .and_then(DocumentKind::from_mime)
            .ok_or_else(|| {
                debug!(content_type = ?content_type, "Rejected upload with unsupported type");
                AppError::UnsupportedFileType {
                    mime_type: content_type.map(str::to_string),
                }
            })
    }

    pub fn check_size(&self, file_name: &str, size: usize) -> AppResult<()> {
        if size > self.max_size_bytes {
            debug!(file_name, size, limit = self.max_size_bytes, "Rejected oversized upload");
            return Err(AppError::FileTooLarge {
                file_name: file_name.to_string(),
                limit: self.max_size_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MB: usize = 5 * 1024 * 1024;

    #[test]
    fn parses_content_type_with_parameters() {
        assert_eq!(
            DocumentKind::from_mime("Application/PDF; charset=binary"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_mime(DOCX_MIME), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_mime("text/plain"), None);
    }

    #[test]
    fn size_limit_is_inclusive() {
        let filter = UploadFilter::new(FIVE_MB);
        assert!(filter.check_size("a.pdf", FIVE_MB).is_ok());
        assert!(matches!(
            filter.check_size("a.pdf", FIVE_MB + 1),
            Err(AppError::FileTooLarge { limit, .. }) if limit == FIVE_MB
        ));
    }

    #[test]
    fn missing_content_type_is_rejected() {
        let filter = UploadFilter::new(FIVE_MB);
        assert!(matches!(
            filter.check_type(None),
            Err(AppError::UnsupportedFileType { mime_type: None })
        ));
    }
}
