use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::UploadedFile;

/// Persists accepted uploads under a working directory, one uniquely named file each.
#[derive(Debug, Clone)]
pub struct TempFileStore {
    dir: PathBuf,
}

/// Exclusive handle to a stored upload. The file is removed by `release`,
/// or on drop if the handle is abandoned on an error path.
#[derive(Debug)]
pub struct StoredUpload {
    file: NamedTempFile,
}

impl TempFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn store(&self, upload: &UploadedFile) -> AppResult<StoredUpload> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to create upload directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let dir = self.dir.clone();
        let prefix = format!("files-{}-", chrono::Utc::now().timestamp_millis());
        let suffix = format!(".{}", stored_extension(upload));
        let data = upload.data.clone();

        let file = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(&suffix)
                .rand_bytes(10)
                .tempfile_in(&dir)?;
            file.write_all(&data)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| AppError::storage(format!("Storage task aborted: {}", e)))?
        .map_err(|e| AppError::storage(format!("Failed to write upload: {}", e)))?;

        debug!(
            file_name = %upload.original_name,
            stored_path = %file.path().display(),
            file_size = upload.size(),
            "Stored upload"
        );

        Ok(StoredUpload { file })
    }
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the stored file. The caller decides whether a failure matters.
    pub fn release(self) -> std::io::Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        debug!(stored_path = %path.display(), "Removed stored upload");
        Ok(())
    }
}

/// Keeps the original extension when it is plain alphanumeric, otherwise
/// falls back to the canonical one for the document kind.
fn stored_extension(upload: &UploadedFile) -> String {
    Path::new(&upload.original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| upload.kind.extension().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DocumentKind;
    use bytes::Bytes;

    fn upload(name: &str, kind: DocumentKind) -> UploadedFile {
        UploadedFile::new(name.to_string(), kind, Bytes::from_static(b"%PDF-1.4"))
    }

    #[test]
    fn extension_follows_original_name() {
        assert_eq!(stored_extension(&upload("Lease.PDF", DocumentKind::Pdf)), "pdf");
        assert_eq!(stored_extension(&upload("notes.docx", DocumentKind::Docx)), "docx");
    }

    #[test]
    fn suspicious_extension_falls_back_to_kind() {
        assert_eq!(stored_extension(&upload("evil.p/../df", DocumentKind::Pdf)), "pdf");
        assert_eq!(stored_extension(&upload("no_extension", DocumentKind::Doc)), "doc");
    }
}
