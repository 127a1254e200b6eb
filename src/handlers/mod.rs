// src/handlers/mod.rs

pub mod generate;
pub mod status;

pub use generate::{generate_text, GenerateRequest};
pub use status::{health_check, server_status, HealthStatus, ServerStatus};
