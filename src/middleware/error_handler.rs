use std::any::Any;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::error::{AppError, ErrorReport};
use crate::models::ErrorBody;
use crate::state::AppState;

/// Last stop for every error response. Outside production the internal
/// detail of a server error is added to the body as `details`.
pub async fn error_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    match report.detail {
        Some(detail) if state.config.runtime_mode.exposes_error_details() => {
            debug!("Exposing internal error detail to client");
            let body = Json(ErrorBody {
                error: report.message,
                details: Some(detail),
            });
            (response.status(), body).into_response()
        }
        _ => response,
    }
}

/// Used by `CatchPanicLayer`: turns a handler panic into the generic 500 error.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Unhandled { message }.into_response()
}
