//! Where the config file lives, and writing a fresh one.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use webbridge_common::ConfigError;

use super::template::default_config_toml;

/// Environment variable naming a config file to use instead of the
/// platform default.
pub const CONFIG_PATH_ENV: &str = "WEBBRIDGE_CONFIG";

/// `$WEBBRIDGE_CONFIG` when set, else `<config dir>/webbridge/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
}

pub(crate) fn resolve_config_path(
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    config_dir
        .map(|dir| dir.join("webbridge").join("config.toml"))
        .ok_or_else(|| {
            ConfigError::ParseError(format!(
                "no platform config directory; set {CONFIG_PATH_ENV}"
            ))
        })
}

/// Write the commented template to `path`. A file already there is left
/// alone. Returns whether the template was written.
pub fn create_default_config(path: &Path) -> Result<bool, ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!("cannot create {}: {e}", parent.display()))
        })?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "config already present, template not written");
            return Ok(false);
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot create {}: {e}",
                path.display()
            )))
        }
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| ConfigError::ParseError(format!("cannot write {}: {e}", path.display())))?;

    info!(path = %path.display(), "wrote default config");
    Ok(true)
}
