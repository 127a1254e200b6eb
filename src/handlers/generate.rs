// src/handlers/generate.rs

use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Body of `POST /api/generate-text`.
///
/// Both fields are untyped JSON so that a missing or mistyped field is
/// answered with the proxy's own 400 rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Proxies a text-generation request to the upstream model with key rotation.
#[axum::debug_handler]
pub async fn generate_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Value>> {
    let body = state
        .proxy
        .generate(
            request.model.as_ref().and_then(Value::as_str),
            request.payload.as_ref(),
        )
        .await?;
    Ok(Json(body))
}
