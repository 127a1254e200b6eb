// src/core/key_rotation.rs

use crate::{
    config::AppConfig,
    core::{
        classify::{classify, FailureClass},
        key_pool::{preview_secret, KeyPool, RotationCursor},
    },
    error::{AppError, Result},
    proxy::Upstream,
};
use axum::http::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use url::Url;

/// Result of calling the upstream once with one key.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(Value),
    RetryableFailure { status: StatusCode, body: Value },
    FatalFailure { status: StatusCode, body: Value },
    NetworkError(String),
}

/// Spreads generation requests across a pool of API keys and fails over to
/// the next key on rate limits, quota errors, server errors and transport
/// failures.
///
/// Each accepted request advances the rotation cursor exactly once, before any
/// network I/O, and then walks the pool sequentially starting at the old
/// cursor position.
#[derive(Debug)]
pub struct KeyRotationProxy {
    pool: KeyPool,
    cursor: RotationCursor,
    base_url: String,
    upstream: Arc<dyn Upstream>,
}

impl KeyRotationProxy {
    pub fn new(pool: KeyPool, base_url: impl Into<String>, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            pool,
            cursor: RotationCursor::new(),
            base_url: base_url.into(),
            upstream,
        }
    }

    pub fn from_config(config: &AppConfig, upstream: Arc<dyn Upstream>) -> Self {
        let pool = KeyPool::from_slots(config.api_keys.iter().map(Some));
        Self::new(pool, config.upstream.base_url.clone(), upstream)
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Pool offset the next accepted request starts from.
    pub fn cursor_position(&self) -> usize {
        self.cursor.position()
    }

    /// Forwards `payload` to `model`'s `generateContent` endpoint, rotating and
    /// failing over across the key pool.
    ///
    /// # Errors
    ///
    /// * [`AppError::NoUsableKeys`] if the pool is empty.
    /// * [`AppError::InvalidRequest`] if `model` or `payload` is missing.
    /// * [`AppError::UpstreamFatal`] on the first non-retryable upstream status.
    /// * [`AppError::UpstreamExhausted`] with the last failure once every key failed.
    #[instrument(name = "generate", skip(self, payload))]
    pub async fn generate(&self, model: Option<&str>, payload: Option<&Value>) -> Result<Value> {
        if self.pool.is_empty() {
            return Err(AppError::NoUsableKeys);
        }

        let model = model.map(str::trim).filter(|m| !m.is_empty());
        let payload = payload.filter(|p| !is_falsy(p));
        let (Some(model), Some(payload)) = (model, payload) else {
            return Err(AppError::invalid_request(
                "Missing model or payload in request body.",
            ));
        };
        let endpoint = self.model_endpoint(model)?;

        let start = self.cursor.advance(self.pool.len());

        let mut last_status = StatusCode::INTERNAL_SERVER_ERROR;
        let mut last_error = json!({});

        for (attempt, key) in self.pool.rotated_from(start).enumerate() {
            let key_preview = preview_secret(key);

            match self.attempt(&endpoint, key, payload).await {
                AttemptOutcome::Success(body) => {
                    info!(
                        api_key.preview = %key_preview,
                        rotation.start = start,
                        attempt,
                        "Gemini API call succeeded"
                    );
                    return Ok(body);
                }
                AttemptOutcome::RetryableFailure { status, body } => {
                    warn!(
                        api_key.preview = %key_preview,
                        status = status.as_u16(),
                        attempt,
                        "Gemini API call failed with retryable status. Trying next key..."
                    );
                    last_status = status;
                    last_error = body;
                }
                AttemptOutcome::FatalFailure { status, body } => {
                    error!(
                        api_key.preview = %key_preview,
                        status = status.as_u16(),
                        details = %body,
                        "Gemini API fatal error"
                    );
                    return Err(AppError::UpstreamFatal {
                        status: status.as_u16(),
                        details: body,
                    });
                }
                AttemptOutcome::NetworkError(message) => {
                    warn!(
                        api_key.preview = %key_preview,
                        error = %message,
                        attempt,
                        "Upstream request failed (network). Trying next key..."
                    );
                    last_error = json!({ "message": message });
                }
            }
        }

        error!(
            keys.tried = self.pool.len(),
            last_status = last_status.as_u16(),
            "All API keys exhausted"
        );
        Err(AppError::UpstreamExhausted {
            status: last_status.as_u16(),
            details: last_error,
        })
    }

    /// One POST with one key, classified.
    async fn attempt(&self, endpoint: &Url, key: &SecretString, payload: &Value) -> AttemptOutcome {
        let mut url = endpoint.clone();
        url.query_pairs_mut().append_pair("key", key.expose_secret());

        let response = match self.upstream.post_json(url, payload).await {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::NetworkError(e.to_string()),
        };

        if response.status.is_success() {
            return match serde_json::from_slice(&response.body) {
                Ok(body) => AttemptOutcome::Success(body),
                Err(e) => AttemptOutcome::NetworkError(format!(
                    "Malformed upstream response body: {e}"
                )),
            };
        }

        // Failure bodies may be empty or non-JSON.
        let body: Value = serde_json::from_slice(&response.body).unwrap_or_else(|_| json!({}));
        match classify(response.status) {
            FailureClass::Retryable => AttemptOutcome::RetryableFailure {
                status: response.status,
                body,
            },
            FailureClass::Fatal => AttemptOutcome::FatalFailure {
                status: response.status,
                body,
            },
        }
    }

    /// `<base-url>/<model>:generateContent`, without the credential.
    fn model_endpoint(&self, model: &str) -> Result<Url> {
        if model
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(AppError::invalid_request(format!(
                "Invalid model identifier: {model}"
            )));
        }

        let raw = format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );
        Ok(Url::parse(&raw)?)
    }
}

/// `null`, `false`, `0` and `""` count as an absent payload.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
