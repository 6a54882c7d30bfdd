//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;
use webbridge_common::{ConfigError, EngineKind};

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_webbridge_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[engine]
kind = "headless"
api_level = 18

[defaults]
javaScriptEnabled = true
mixedContentMode = "always"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.engine.kind, EngineKind::Headless);
    assert_eq!(config.engine.api_level, 18);
    assert_eq!(
        config.defaults.get("javaScriptEnabled"),
        Some(&serde_json::json!(true))
    );
    assert_eq!(
        config.defaults.get("mixedContentMode"),
        Some(&serde_json::json!("always"))
    );
    // Defaults preserved
    assert_eq!(config.window.title, "webbridge");
    assert!(!config.host.direct_bridge);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_returns_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[window]
width = 5
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.width, 5);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webbridge").join("config.toml");

    assert!(create_default_config(&path).unwrap());
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.engine.kind, EngineKind::System);
    assert!(config.defaults.is_empty());
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::BridgeConfig;

    let content = default_config_toml();
    let config: BridgeConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.window.width, 1024);
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("webbridge"));
        assert!(path_str.ends_with("config.toml"));
    }
}

#[test]
fn newer_schema_version_is_refused() {
    let err = parse_config("schema_version = 7\n[window]\ntitle = \"x\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(msg) if msg.contains("schema_version 7")));

    let config = parse_config("schema_version = 1\n[window]\ntitle = \"x\"\n").unwrap();
    assert_eq!(config.window.title, "x");
}

#[test]
fn default_template_never_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[window]\ntitle = \"mine\"\n").unwrap();

    assert!(!create_default_config(&path).unwrap());
    assert_eq!(load_from_path(&path).unwrap().window.title, "mine");
}

#[test]
fn env_override_wins_over_config_dir() {
    use super::paths::resolve_config_path;
    use std::ffi::OsString;
    use std::path::PathBuf;

    let dir = Some(PathBuf::from("/home/u/.config"));
    assert_eq!(
        resolve_config_path(Some(OsString::from("/etc/wb.toml")), dir.clone()).unwrap(),
        PathBuf::from("/etc/wb.toml")
    );
    assert_eq!(
        resolve_config_path(Some(OsString::new()), dir.clone()).unwrap(),
        PathBuf::from("/home/u/.config/webbridge/config.toml")
    );
    assert!(resolve_config_path(None, None).is_err());
}
