// src/config/validation.rs

use crate::config::AppConfig;
use crate::core::key_pool::preview_key;
use crate::error::{AppError, Result};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> Result<()> {
        debug!("Starting configuration validation");

        Self::validate_server_config(config)?;
        Self::validate_upstream_config(config)?;
        Self::inspect_keys(config);

        debug!("Configuration validation completed successfully");
        Ok(())
    }

    fn validate_server_config(config: &AppConfig) -> Result<()> {
        if config.server.port == 0 {
            return Err(AppError::config_validation(
                "Server port cannot be 0",
                Some("server.port"),
            ));
        }

        if config.server.connect_timeout_secs == 0 {
            return Err(AppError::config_validation(
                "Connect timeout cannot be 0",
                Some("server.connect_timeout_secs"),
            ));
        }

        if config.server.request_timeout_secs == 0 {
            return Err(AppError::config_validation(
                "Request timeout cannot be 0",
                Some("server.request_timeout_secs"),
            ));
        }

        Ok(())
    }

    fn validate_upstream_config(config: &AppConfig) -> Result<()> {
        let base_url = &config.upstream.base_url;
        let url = Url::parse(base_url).map_err(|e| {
            AppError::config_validation(
                format!("Invalid URL in upstream.base_url: {} - {}", base_url, e),
                Some("upstream.base_url"),
            )
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::config_validation(
                format!("Unsupported upstream scheme '{}'. Supported: http, https", scheme),
                Some("upstream.base_url"),
            )),
        }
    }

    /// An empty pool is served (every generate call fails), so keys only warn.
    fn inspect_keys(config: &AppConfig) {
        let usable = config.usable_key_count();
        if usable == 0 {
            warn!("No usable API keys configured; text generation requests will fail until keys are provided");
            return;
        }

        let mut seen = HashSet::new();
        for key in config.api_keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
            if !seen.insert(key) {
                warn!(api_key.preview = %preview_key(key), "Duplicate API key in pool");
            }
        }
        debug!(keys.usable = usable, keys.unique = seen.len(), "Validated key slots");
    }
}
