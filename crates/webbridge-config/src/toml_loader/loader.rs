//! Reading a config file into a [`BridgeConfig`].

use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};
use webbridge_common::ConfigError;

use crate::schema::{BridgeConfig, CONFIG_SCHEMA_VERSION};
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Read and parse `path`. Validation problems are logged, not returned;
/// the `load_config*` entry points decide whether they are fatal.
pub fn load_from_path(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    let config = parse_config(&content)?;
    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), problems = %e, "config has invalid values");
    }
    info!(path = %path.display(), engine = %config.engine.kind, "config loaded");
    Ok(config)
}

/// Parse config text. A `schema_version` this build does not know is
/// refused rather than half-read.
pub fn parse_config(content: &str) -> Result<BridgeConfig, ConfigError> {
    let table: toml::Table = content
        .parse()
        .map_err(|e| ConfigError::ParseError(format!("invalid TOML: {e}")))?;

    if let Some(version) = table.get("schema_version") {
        let known = version
            .as_integer()
            .is_some_and(|v| (1..=i64::from(CONFIG_SCHEMA_VERSION)).contains(&v));
        if !known {
            return Err(ConfigError::ParseError(format!(
                "unsupported schema_version {version}, this build reads up to {CONFIG_SCHEMA_VERSION}"
            )));
        }
    }

    toml::Value::Table(table)
        .try_into()
        .map_err(|e| ConfigError::ParseError(format!("invalid config: {e}")))
}

/// Load from [`default_config_path`], writing the template first when no
/// file exists yet.
pub fn load_default() -> Result<BridgeConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(BridgeConfig::default())
        }
        other => other,
    }
}
