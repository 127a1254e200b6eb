// src/state.rs

use crate::config::AppConfig;
use crate::core::KeyRotationProxy;
use crate::error::Result;
use crate::proxy::{ReqwestUpstream, Upstream};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state accessible by all Axum handlers.
#[derive(Debug)]
pub struct AppState {
    pub proxy: KeyRotationProxy,
    pub max_request_bytes: usize,
}

impl AppState {
    /// Builds the HTTP client and the key-rotation proxy from configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        info!("Creating shared AppState: initializing HTTP client and key pool...");
        let upstream = ReqwestUpstream::from_config(&config.server)?;
        Ok(Self::with_upstream(config, Arc::new(upstream)))
    }

    /// Same as [`AppState::new`] with a caller-supplied upstream.
    pub fn with_upstream(config: &AppConfig, upstream: Arc<dyn Upstream>) -> Self {
        let proxy = KeyRotationProxy::from_config(config, upstream);
        if proxy.pool_size() == 0 {
            warn!("Key pool is empty; /api/generate-text will answer 500 until keys are configured");
        }
        info!(
            keys.count = proxy.pool_size(),
            upstream.base_url = %config.upstream.base_url,
            "AppState initialized"
        );

        Self {
            proxy,
            max_request_bytes: config.server.max_request_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appstate_filters_blank_keys() {
        let config = AppConfig {
            api_keys: vec!["key-one".into(), "  ".into(), "".into(), "key-two".into()],
            ..AppConfig::default()
        };
        let state = AppState::new(&config).unwrap();
        assert_eq!(state.proxy.pool_size(), 2);
        assert_eq!(state.proxy.cursor_position(), 0);
    }

    #[test]
    fn test_appstate_without_keys_still_builds() {
        let state = AppState::new(&AppConfig::default()).unwrap();
        assert_eq!(state.proxy.pool_size(), 0);
        assert_eq!(state.max_request_bytes, 10 * 1024 * 1024);
    }
}
