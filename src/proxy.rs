// src/proxy.rs

//! Outbound transport to the generative-language API.
//!
//! The failover loop talks to [`Upstream`] rather than to `reqwest` directly,
//! so the rotation logic can be exercised against scripted upstreams.

use crate::{
    config::ServerConfig,
    error::{AppError, Result},
};
use async_trait::async_trait;
use axum::{body::Bytes, http::StatusCode};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Status and raw body of one upstream call.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

#[async_trait]
pub trait Upstream: Send + Sync + std::fmt::Debug {
    /// Performs a single POST of `payload` as JSON to `url`.
    ///
    /// Any transport failure (connect, timeout, body read) is an `Err`; every
    /// HTTP status, successful or not, is an `Ok`.
    async fn post_json(&self, url: Url, payload: &Value) -> Result<UpstreamResponse>;
}

/// [`Upstream`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    client: Client,
}

impl ReqwestUpstream {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client with the configured connect and total timeouts.
    pub fn from_config(server: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(server.connect_timeout_secs))
            .timeout(Duration::from_secs(server.request_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    async fn post_json(&self, url: Url, payload: &Value) -> Result<UpstreamResponse> {
        // The URL carries the credential; errors must not.
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Upstream request timed out");
                }
                AppError::from(e.without_url())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::from(e.without_url()))?;
        debug!(status = %status, body.len = body.len(), "Received response from upstream");

        Ok(UpstreamResponse { status, body })
    }
}
