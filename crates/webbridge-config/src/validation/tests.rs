//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = BridgeConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_api_level_zero() {
    let mut config = BridgeConfig::default();
    config.engine.api_level = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("engine.api_level"));
}

#[test]
fn catches_lifecycle_capacity_too_large() {
    let mut config = BridgeConfig::default();
    config.host.lifecycle_capacity = 4096;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("host.lifecycle_capacity"));
}

#[test]
fn catches_window_too_small() {
    let mut config = BridgeConfig::default();
    config.window.width = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.width"));
}

#[test]
fn catches_empty_window_title() {
    let mut config = BridgeConfig::default();
    config.window.title = "   ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.title"));
}

#[test]
fn rejects_source_in_defaults() {
    let mut config = BridgeConfig::default();
    config
        .defaults
        .insert("source".into(), serde_json::json!("https://example.com"));
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("defaults.source"));
}

#[test]
fn rejects_table_valued_default() {
    let mut config = BridgeConfig::default();
    config
        .defaults
        .insert("basicAuthCredential".into(), serde_json::json!({"username": "a"}));
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("defaults.basicAuthCredential"));
}

#[test]
fn accepts_scalar_and_array_defaults() {
    let mut config = BridgeConfig::default();
    config
        .defaults
        .insert("javaScriptEnabled".into(), serde_json::json!(true));
    config.defaults.insert(
        "urlPrefixesForDefaultIntent".into(),
        serde_json::json!(["tel:", "mailto:"]),
    );
    assert!(validate(&config).is_ok());
}

#[test]
fn collects_multiple_errors() {
    let mut config = BridgeConfig::default();
    config.engine.api_level = 99;
    config.window.height = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("engine.api_level"));
    assert!(err.contains("window.height"));
    assert!(err.contains("; "));
}

#[test]
fn engine_scoped_defaults_are_checked_inside() {
    let mut config = BridgeConfig::default();
    config.defaults.insert(
        "headless".into(),
        serde_json::json!({ "textZoom": 150, "source": "https://example.com" }),
    );
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("defaults.headless.source"));

    config
        .defaults
        .insert("headless".into(), serde_json::json!({ "textZoom": 150 }));
    assert!(validate(&config).is_ok());

    config.defaults.insert("system".into(), serde_json::json!(true));
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("defaults.system must be a table"));
}
