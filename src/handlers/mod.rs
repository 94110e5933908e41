pub mod chat;
pub mod document;
pub mod health;
pub mod upload;

pub use chat::*;
pub use document::*;
pub use health::*;
pub use upload::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{error_middleware, handle_panic, logging_middleware};
use crate::state::AppState;

/// Assembles every endpoint, the static front-end fallback and the middleware stack.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_request_body_bytes();
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health_handler))
        .route("/generate-document", post(generate_document_handler))
        .route("/chat", post(chat_handler))
        .route("/upload-training-files", post(upload_training_files_handler))
        .fallback_service(static_dir)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    error_middleware,
                ))
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
