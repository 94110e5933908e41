use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::{GenerateDocumentRequest, GenerateDocumentResponse};
use crate::services::prompt_builder;
use crate::state::AppState;

pub async fn generate_document_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateDocumentRequest>, JsonRejection>,
) -> AppResult<Json<GenerateDocumentResponse>> {
    let Json(request) = payload?;
    let (document_type, details) = request.validate()?;

    info!(
        document_type = %document_type,
        details_length = details.len(),
        "Generating document"
    );

    let prompt = prompt_builder::document_prompt(&document_type, &details);
    let document = state.completion.complete(&prompt).await.map_err(|e| {
        error!(document_type = %document_type, error = %e, "Document generation failed");
        AppError::completion("Failed to generate document", e)
    })?;

    info!(document_length = document.len(), "Document generated");
    Ok(Json(GenerateDocumentResponse { document }))
}
