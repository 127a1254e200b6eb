// src/config/loader.rs

use crate::config::{environment, AppConfig, ConfigValidator};
use crate::error::{AppError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Load configuration from file (if present) and the process environment.
pub fn load_config(config_path: &Path) -> Result<AppConfig> {
    load_config_with(config_path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`], with an explicit environment lookup.
pub fn load_config_with<F>(config_path: &Path, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if config_path.exists() {
        info!("Loading configuration from file: {}", config_path.display());
        load_from_file(config_path)?
    } else {
        info!("Configuration file not found, using defaults");
        AppConfig::default()
    };

    environment::override_with_env(&mut config, lookup);

    ConfigValidator::validate(&config)?;

    debug!("Configuration loaded and validated successfully");
    Ok(config)
}

fn load_from_file(config_path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(config_path).map_err(|_| AppError::ConfigNotFound {
        path: config_path.display().to_string(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| AppError::ConfigParse {
        message: format!("Failed to parse config file: {}", e),
        line: e.location().map(|loc| loc.line()),
    })
}
