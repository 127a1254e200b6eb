// src/config/mod.rs

pub mod app;
pub mod environment;
pub mod loader;
pub mod validation;

pub use app::{AppConfig, ServerConfig, UpstreamConfig};
pub use loader::{load_config, load_config_with};
pub use validation::ConfigValidator;
