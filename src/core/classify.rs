// src/core/classify.rs

use axum::http::StatusCode;

/// What the failover loop does with a non-2xx upstream status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Rate limit, quota or server trouble on this key. Try the next key.
    Retryable,
    /// The request itself was rejected. No other key will fix it.
    Fatal,
}

/// 429, 403 and anything from 500 up are retryable; every other failure
/// status is fatal.
pub fn classify(status: StatusCode) -> FailureClass {
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::FORBIDDEN
        || status.as_u16() >= 500
    {
        FailureClass::Retryable
    } else {
        FailureClass::Fatal
    }
}
