//! Integration tests for Settings loading with layered precedence.
//!
//! Precedence: defaults -> global file -> explicit file -> CLUSTER_TOOL_* env vars.
//! These tests use explicit files in temp directories; the global file is
//! whatever the machine has, so they only assert keys the explicit file sets.

use std::fs;

use tempfile::TempDir;

use cluster_tool::application::ApplicationError;
use cluster_tool::config::Settings;

#[test]
fn given_explicit_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cluster-tool.toml");
    fs::write(
        &path,
        r#"
max_history = 3
max_input_bytes = 2048
pretty = false
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert_eq!(settings.max_history, 3);
    assert_eq!(settings.max_input_bytes, 2048);
    assert!(!settings.pretty);
}

#[test]
fn given_zero_history_when_load_then_config_error() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cluster-tool.toml");
    fs::write(&path, "max_history = 0\n").unwrap();

    // Act
    let result = Settings::load(Some(path.as_path()));

    // Assert
    match result {
        Err(ApplicationError::Config { message }) => assert!(message.contains("max_history")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(dir.path().join("absent.toml").as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cluster-tool.toml");
    fs::write(&path, "max_history = [\n").unwrap();

    let result = Settings::load(Some(path.as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_template_when_written_and_loaded_then_acts_as_defaults() {
    // Arrange: every key in the template is commented out
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cluster-tool.toml");
    fs::write(&path, Settings::template()).unwrap();

    // Act
    let result = Settings::load(Some(path.as_path()));

    // Assert
    assert!(result.is_ok());
}
