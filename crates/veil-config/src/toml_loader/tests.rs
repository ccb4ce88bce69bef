//! Config file loading, default creation and path layout.

use super::template::default_config_toml;
use super::*;
use crate::schema::{ContentMode, VeilConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use veil_common::ConfigError;

fn config_file(text: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("veil.toml");
    std::fs::write(&path, text).unwrap();
    (dir, path)
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    match load_from_path(&missing) {
        Err(ConfigError::FileNotFound(p)) => assert_eq!(p, missing),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn partial_file_fills_in_defaults() {
    let (_dir, path) = config_file(
        r#"
[content]
mode = "dev_server"
dev_server_port = 5173

[dialogs]
persistent = ["search"]
"#,
    );

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.content.mode, ContentMode::DevServer);
    assert_eq!(config.content.dev_server_port, 5173);
    assert_eq!(config.dialogs.persistent, vec!["search"]);
    assert_eq!(config.pool.retention_floor, 2);
    assert_eq!(config.dialogs.menu.height, 470);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let (_dir, path) = config_file("[pool\nprewarm = ");
    assert!(matches!(
        load_from_path(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn out_of_range_values_load_leniently() {
    let (_dir, path) = config_file("[content]\ndev_server_port = 0\n");
    assert_eq!(load_from_path(&path).unwrap().content.dev_server_port, 0);
}

#[test]
fn written_default_loads_back_as_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("veil").join("config.toml");

    create_default_config(&path).unwrap();
    let config = load_from_path(&path).unwrap();
    assert_eq!(config.content.mode, ContentMode::Packaged);
    assert_eq!(config.dialogs.persistent, vec!["search", "preview"]);
}

#[test]
fn template_passes_validation() {
    let config: VeilConfig = toml::from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn user_path_ends_in_app_dir() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("veil/config.toml"));
    }
}

#[test]
fn create_default_keeps_existing_file() {
    let (_dir, path) = config_file("[pool]\nprewarm = 3\n");

    create_default_config(&path).unwrap();
    assert_eq!(load_from_path(&path).unwrap().pool.prewarm, 3);
}

#[test]
fn config_path_nests_under_app_dir() {
    let path = super::paths::config_path_in(Path::new("/home/u/.config"));
    assert_eq!(path, Path::new("/home/u/.config/veil/config.toml"));
}
