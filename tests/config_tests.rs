// tests/config_tests.rs

use fiction_gen_proxy::config::{load_config, load_config_with, AppConfig, ServerConfig};
use fiction_gen_proxy::AppError;
use serial_test::serial;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_missing_file_uses_defaults() {
    let config = load_config_with(Path::new("/nonexistent/fiction-proxy.yaml"), env_from(&[])).unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.request_timeout_secs, 9);
    assert_eq!(
        config.upstream.base_url,
        "https://generativelanguage.googleapis.com/v1beta/models"
    );
    assert_eq!(config.usable_key_count(), 0);
}

#[test]
fn test_file_values_are_loaded() {
    let file = yaml_file(
        r#"
server:
  port: 8081
  request_timeout_secs: 20
upstream:
  base_url: "http://localhost:9999/v1beta/models"
api_keys:
  - "file-key-one"
  - "file-key-two"
"#,
    );

    let config = load_config_with(file.path(), env_from(&[])).unwrap();
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.request_timeout_secs, 20);
    assert_eq!(config.server.connect_timeout_secs, 5);
    assert_eq!(config.upstream.base_url, "http://localhost:9999/v1beta/models");
    assert_eq!(config.api_keys, vec!["file-key-one", "file-key-two"]);
}

#[test]
fn test_env_slots_follow_file_keys_in_slot_order() {
    let file = yaml_file("api_keys: [\"file-key\"]\n");

    let config = load_config_with(
        file.path(),
        env_from(&[
            ("GEMINI_API_KEY3", "env-three"),
            ("GEMINI_API_KEY", "env-primary"),
            ("GEMINI_API_KEY1", "env-one"),
            ("GEMINI_API_KEY16", "ignored-slot"),
        ]),
    )
    .unwrap();

    assert_eq!(
        config.api_keys,
        vec!["file-key", "env-primary", "env-one", "env-three"]
    );
}

#[test]
fn test_env_overrides_scalars() {
    let file = yaml_file("server:\n  port: 8081\n");

    let config = load_config_with(
        file.path(),
        env_from(&[
            ("PORT", "9090"),
            ("GEMINI_API_URL", "http://127.0.0.1:1234/models"),
            ("FICTION_PROXY_REQUEST_TIMEOUT", "30"),
            ("FICTION_PROXY_CONNECT_TIMEOUT", "not-a-number"),
        ]),
    )
    .unwrap();

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.upstream.base_url, "http://127.0.0.1:1234/models");
    assert_eq!(config.server.request_timeout_secs, 30);
    assert_eq!(config.server.connect_timeout_secs, 5);
}

#[test]
fn test_blank_slots_do_not_count_as_usable() {
    let config = load_config_with(
        Path::new("/nonexistent/fiction-proxy.yaml"),
        env_from(&[("GEMINI_API_KEY", "   "), ("GEMINI_API_KEY2", " real-key ")]),
    )
    .unwrap();

    assert_eq!(config.usable_key_count(), 1);
}

#[test]
fn test_invalid_yaml_is_a_parse_error() {
    let file = yaml_file("server:\n  port: [not, a, port\n");

    let err = load_config_with(file.path(), env_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::ConfigParse { .. }), "{err:?}");
}

#[test]
fn test_invalid_values_fail_validation() {
    let file = yaml_file("upstream:\n  base_url: \"ftp://example.com/models\"\n");
    let err = load_config_with(file.path(), env_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::ConfigValidation { .. }), "{err:?}");

    let err = load_config_with(
        Path::new("/nonexistent/fiction-proxy.yaml"),
        env_from(&[("FICTION_PROXY_REQUEST_TIMEOUT", "0")]),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::ConfigValidation { .. }), "{err:?}");
}

#[test]
fn test_server_config_defaults() {
    let server = ServerConfig::default();
    assert_eq!(server.host, "0.0.0.0");
    assert_eq!(server.connect_timeout_secs, 5);
    assert_eq!(server.max_request_bytes, 10 * 1024 * 1024);
}

#[test]
#[serial]
fn test_load_config_reads_process_environment() {
    std::env::set_var("GEMINI_API_KEY", "process-primary");
    std::env::set_var("GEMINI_API_KEY2", "process-two");

    let result = load_config(Path::new("/nonexistent/fiction-proxy.yaml"));

    std::env::remove_var("GEMINI_API_KEY");
    std::env::remove_var("GEMINI_API_KEY2");

    let config = result.unwrap();
    let position = |key: &str| config.api_keys.iter().position(|k| k == key).unwrap();
    assert!(position("process-primary") < position("process-two"));
}
