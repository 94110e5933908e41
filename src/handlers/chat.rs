use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::{ChatRequest, ChatResponse};
use crate::services::prompt_builder;
use crate::state::AppState;

pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    let message = request.validate()?;

    info!(message_length = message.len(), "Answering chat message");

    let prompt = prompt_builder::chat_prompt(&message);
    let answer = state.completion.complete(&prompt).await.map_err(|e| {
        error!(error = %e, "Chat completion failed");
        AppError::completion("Failed to get response", e)
    })?;

    Ok(Json(ChatResponse::success(answer)))
}
