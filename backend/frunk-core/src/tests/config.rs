use crate::DEFAULT_API_ROOT;
use crate::config::{API_ROOT_ENV, AppConfig};
use crate::error::config::ConfigError;

use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

/// **VALUE**: Verifies the defaults used when no config file exists.
///
/// **WHY THIS MATTERS**: First launch has no config; the client must still
/// find the local server and debounce at the documented quiet period.
///
/// **BUG THIS CATCHES**: Would catch a missing file being treated as an error.
#[test]
fn given_missing_file_when_loaded_then_defaults_returned() {
    let dir = TempDir::new().unwrap();

    let config = AppConfig::load(dir.path()).unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.server.api_root, DEFAULT_API_ROOT);
    assert_eq!(config.notes.per_page, 10);
    assert_eq!(config.notes.autosave_quiet(), Duration::from_millis(500));
    assert_eq!(config.notes.saved_flash(), Duration::from_secs(2));
}

/// **VALUE**: Verifies a saved config loads back and leaves no temp file behind.
///
/// **BUG THIS CATCHES**: Would catch the atomic rename being skipped.
#[test]
fn given_saved_config_when_loaded_then_values_survive() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.notes.per_page = 25;
    config.server.api_root = "https://notes.example.com/api/".to_string();

    config.save(dir.path()).unwrap();
    let loaded = AppConfig::load(dir.path()).unwrap();

    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
}

/// **VALUE**: Verifies partial files are filled with defaults.
///
/// **WHY THIS MATTERS**: Users hand-edit the file and only write what they change.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` on a field.
#[test]
fn given_partial_file_when_loaded_then_missing_fields_defaulted() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "notes": { "per_page": 50 } }"#,
    )
    .unwrap();

    let config = AppConfig::load(dir.path()).unwrap();

    assert_eq!(config.notes.per_page, 50);
    assert_eq!(config.notes.autosave_quiet_ms, 500);
    assert_eq!(config.server.api_root, DEFAULT_API_ROOT);
}

/// **VALUE**: Verifies out-of-range values are rejected with the field name.
///
/// **WHY THIS MATTERS**: The server clamps `per_page` to 1-100; a client asking
/// for more would mis-render the pager.
///
/// **BUG THIS CATCHES**: Would catch validation being skipped on load.
#[test]
fn given_invalid_values_when_loaded_then_validation_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "notes": { "per_page": 500 } }"#,
    )
    .unwrap();

    let error = AppConfig::load(dir.path()).unwrap_err();

    match error {
        ConfigError::ValidationError { field, .. } => assert_eq!(field, "notes.per_page"),
        other => panic!("expected ValidationError, got {other:?}"),
    }
}

/// **VALUE**: Verifies corrupted JSON is reported, not replaced with defaults.
///
/// **BUG THIS CATCHES**: Would catch parse failures silently discarding the user's file.
#[test]
fn given_corrupted_file_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let error = AppConfig::load(dir.path()).unwrap_err();

    assert!(matches!(error, ConfigError::ParseError { .. }));
}

/// **VALUE**: Verifies the environment variable overrides the API root.
///
/// **WHY THIS MATTERS**: Pointing the client at a staging server should not
/// require editing the config file.
///
/// **BUG THIS CATCHES**: Would catch the override bypassing URL validation.
#[test]
#[serial]
fn given_env_override_when_applied_then_api_root_replaced() {
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(API_ROOT_ENV, "http://10.0.0.5:5003/api/") };
    let mut config = AppConfig::default();
    let applied = config.apply_env_overrides();

    unsafe { std::env::set_var(API_ROOT_ENV, "ftp://nope") };
    let mut rejected = AppConfig::default();
    let invalid = rejected.apply_env_overrides();
    unsafe { std::env::remove_var(API_ROOT_ENV) };

    assert!(applied.unwrap());
    assert_eq!(config.server.api_root, "http://10.0.0.5:5003/api/");
    assert!(invalid.is_err());
}
