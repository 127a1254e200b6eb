// src/middleware/request_size_limit.rs

use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

/// Rejects bodies whose declared `Content-Length` exceeds the configured limit.
pub async fn request_size_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let max_size = state.max_request_bytes;
    let method = request.method();
    if matches!(method, &axum::http::Method::POST | &axum::http::Method::PUT | &axum::http::Method::PATCH) {
        let declared = request
            .headers()
            .get(axum::http::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<usize>().ok());

        if let Some(length) = declared.filter(|length| *length > max_size) {
            warn!(
                content_length = length,
                max_size,
                method = %method,
                "Request rejected: body size exceeds limit"
            );
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }
    }

    Ok(next.run(request).await)
}
