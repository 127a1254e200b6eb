// src/middleware/no_cache.rs

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

const NO_STORE: &str = "no-store, no-cache, must-revalidate, private";

/// Marks every response as uncacheable so the browser always sees fresh data.
pub async fn no_cache_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    response
}
