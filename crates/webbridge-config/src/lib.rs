//! webbridge configuration system.
//!
//! TOML-based configuration for engine selection, host options, the
//! windowed host and per-widget property defaults. All sections use
//! sensible defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{BridgeConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use webbridge_common::ConfigError;

/// Load config from the platform default path, creating it if missing,
/// and validate the result.
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (e.g. a `--config` override).
pub fn load_config_from(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &BridgeConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = BridgeConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"engine\""));
        assert!(json.contains("\"host\""));
        assert!(json.contains("\"window\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"defaults\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[engine]\napi_level = 0\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = BridgeConfig::default();
        let json = config_to_json(&config);
        let parsed: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.window.title, "webbridge");
        assert_eq!(parsed.engine.api_level, 33);
        assert_eq!(parsed.host.lifecycle_capacity, 16);
    }
}
