use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is propagated as is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Tags the request with an id, runs it inside a span carrying that id and
/// echoes the id on the response.
pub async fn logging_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = incoming_request_id(request.headers()).unwrap_or_else(generated_request_id);
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = request_id.to_str().unwrap_or_default(),
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = async move {
        tracing::debug!(version = ?request.version(), "Request started");
        let response = next.run(request).await;
        tracing::info!(
            status = %response.status(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await;

    response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    response
}

/// Reuses an id set by a proxy or client when it is printable and reasonably short.
fn incoming_request_id(headers: &HeaderMap) -> Option<HeaderValue> {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|value| {
            value
                .to_str()
                .map(|id| !id.trim().is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
                .unwrap_or(false)
        })
        .cloned()
}

fn generated_request_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}
