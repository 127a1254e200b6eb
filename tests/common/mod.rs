//! Common test utilities and fixtures

#![allow(dead_code)]

use fiction_gen_proxy::{config::AppConfig, create_router, AppState};
use std::sync::Arc;

/// Test configuration builder
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_keys.push(key.into());
        self
    }

    pub fn with_api_keys(mut self, keys: &[&str]) -> Self {
        self.config.api_keys.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    /// Points the upstream at a mock server's `/v1beta/models` collection.
    pub fn with_mock_upstream(mut self, server: &wiremock::MockServer) -> Self {
        self.config.upstream.base_url = format!("{}/v1beta/models", server.uri());
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.config.server.request_timeout_secs = secs;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the full router for `config`, returning the shared state alongside it.
pub fn test_app(config: &AppConfig) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config).expect("Failed to build AppState"));
    (create_router(state.clone()), state)
}

/// Upstream path for `model`, relative to the mock server root.
pub fn generate_path(model: &str) -> String {
    format!("/v1beta/models/{model}:generateContent")
}

/// Test utilities for HTTP requests
pub mod http {
    use axum::{body::Body, http::Request};
    use serde_json::Value;

    pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }
}

/// Test assertions and utilities
pub mod assertions {
    use axum::{body::to_bytes, response::Response};
    use serde_json::Value;

    pub async fn assert_json_response(response: Response, expected_status: u16) -> Value {
        assert_eq!(response.status().as_u16(), expected_status);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).expect("Response body should be valid JSON")
    }
}
