// src/config/app.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

/// Where generation requests are sent.
#[derive(Debug, Deserialize, Clone, PartialEq, Serialize)]
pub struct UpstreamConfig {
    /// Models collection URL; `/<model>:generateContent` is appended per request.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Credential slots in pool order. Environment slots are appended after these.
    #[serde(default)]
    pub api_keys: Vec<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    9
}

fn default_max_request_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

impl AppConfig {
    /// Number of slots holding a usable (non-blank) credential.
    pub fn usable_key_count(&self) -> usize {
        self.api_keys.iter().filter(|k| !k.trim().is_empty()).count()
    }
}
