use axum::{
    extract::{multipart::{Field, MultipartRejection}, Multipart, State},
    response::Json,
};
use bytes::BytesMut;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{ProcessedFileResult, UploadResponse, UploadedFile};
use crate::services::UploadFilter;
use crate::state::AppState;

const FILE_FIELD_NAMES: &[&str] = &["files", "files[]"];

pub async fn upload_training_files_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let start = Instant::now();

    // A body that is not multipart carries no files.
    let mut multipart = multipart.map_err(|rejection| {
        debug!(rejection = %rejection.body_text(), "Upload body is not multipart");
        AppError::NoFilesUploaded
    })?;

    // Every part is validated before anything is written to disk.
    let files = collect_files(
        &mut multipart,
        &state.upload_filter,
        state.config.max_files_per_upload,
    )
    .await?;

    if files.is_empty() {
        return Err(AppError::NoFilesUploaded);
    }

    info!(file_count = files.len(), "Processing uploaded files");

    let mut processed_files = Vec::with_capacity(files.len());
    for file in files {
        processed_files.push(process_file(&state, file).await?);
    }

    let failed = processed_files.iter().filter(|f| f.is_error()).count();
    info!(
        file_count = processed_files.len(),
        failed_count = failed,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Upload batch completed"
    );

    Ok(Json(UploadResponse::new(processed_files)))
}

/// Store, extract, release. Extraction failures stay inside the file's result.
async fn process_file(state: &AppState, file: UploadedFile) -> AppResult<ProcessedFileResult> {
    let stored = state.temp_store.store(&file).await?;
    let size = file.size();

    let result = match state.extractor.extract(stored.path(), file.kind).await {
        Ok(content) => {
            info!(
                file_name = %file.original_name,
                file_size = size,
                text_length = content.len(),
                "File processed"
            );
            ProcessedFileResult::extracted(file.original_name, content, size)
        }
        Err(e) => {
            warn!(file_name = %file.original_name, error = %e, "File extraction failed");
            ProcessedFileResult::failed(file.original_name, e.to_string())
        }
    };

    // A leftover file does not change this file's result.
    if let Err(e) = stored.release() {
        warn!(file_name = %result.filename, error = %e, "Failed to remove stored upload");
    }

    Ok(result)
}

async fn collect_files(
    multipart: &mut Multipart,
    filter: &UploadFilter,
    max_files: usize,
) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let is_file_field = field
            .name()
            .map(|name| FILE_FIELD_NAMES.contains(&name))
            .unwrap_or(false);
        let file_name = field.file_name().unwrap_or("").to_string();

        if !is_file_field || file_name.is_empty() {
            debug!(field_name = ?field.name(), "Skipping non-file multipart field");
            continue;
        }

        if files.len() == max_files {
            return Err(AppError::invalid_request(format!(
                "Too many files: at most {} files per upload",
                max_files
            )));
        }

        let kind = filter.check_type(field.content_type())?;
        let data = read_limited(field, &file_name, filter).await?;

        debug!(
            file_name = %file_name,
            file_size = data.len(),
            mime_type = kind.mime_type(),
            "Accepted file part"
        );
        files.push(UploadedFile::new(file_name, kind, data.freeze()));
    }

    Ok(files)
}

/// Buffers a part, failing as soon as it grows past the size limit.
async fn read_limited(
    mut field: Field<'_>,
    file_name: &str,
    filter: &UploadFilter,
) -> AppResult<BytesMut> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        filter.check_size(file_name, data.len() + chunk.len())?;
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
