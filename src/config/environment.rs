//! Environment-based configuration: credential slots and scalar overrides.

use crate::config::AppConfig;
use tracing::{info, warn};

/// Primary credential slot; numbered fallbacks follow it.
pub const PRIMARY_KEY_SLOT: &str = "GEMINI_API_KEY";
/// Highest numbered fallback slot (`GEMINI_API_KEY1` ..= `GEMINI_API_KEY15`).
pub const FALLBACK_KEY_SLOTS: usize = 15;

/// Names of the credential slots in pool order.
pub fn key_slot_names() -> Vec<String> {
    std::iter::once(PRIMARY_KEY_SLOT.to_string())
        .chain((1..=FALLBACK_KEY_SLOTS).map(|i| format!("{PRIMARY_KEY_SLOT}{i}")))
        .collect()
}

/// Reads every credential slot, keeping absent ones as `None` so that the
/// caller decides what to filter.
pub fn read_key_slots<F>(lookup: F) -> Vec<Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    key_slot_names().iter().map(|name| lookup(name.as_str())).collect()
}

/// Applies environment overrides on top of file-based configuration.
///
/// `lookup` abstracts `std::env::var` so tests can supply a fixed map.
pub fn override_with_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port_str) = lookup("PORT") {
        match port_str.parse::<u16>() {
            Ok(port) => {
                info!(server.port = port, "Overriding server port from environment variable");
                config.server.port = port;
            }
            Err(_) => warn!("Invalid PORT environment variable: {}", port_str),
        }
    }

    if let Some(base_url) = lookup("GEMINI_API_URL") {
        info!(upstream.base_url = %base_url, "Overriding upstream base URL from environment variable");
        config.upstream.base_url = base_url;
    }

    if let Some(timeout) = parse_secs(&lookup, "FICTION_PROXY_REQUEST_TIMEOUT") {
        config.server.request_timeout_secs = timeout;
    }

    if let Some(timeout) = parse_secs(&lookup, "FICTION_PROXY_CONNECT_TIMEOUT") {
        config.server.connect_timeout_secs = timeout;
    }

    let env_keys = read_key_slots(&lookup);
    let present = env_keys.iter().filter(|k| k.is_some()).count();
    if present > 0 {
        info!(slots.present = present, "Appending credential slots from environment");
    }
    config.api_keys.extend(env_keys.into_iter().flatten());
}

fn parse_secs<F>(lookup: &F, name: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.parse::<u64>() {
        Ok(secs) => {
            info!(variable = name, secs, "Overriding timeout from environment variable");
            Some(secs)
        }
        Err(_) => {
            warn!(variable = name, value = %raw, "Invalid timeout environment variable");
            None
        }
    }
}
