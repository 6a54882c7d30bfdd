//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;
mod misc;

#[cfg(test)]
mod tests;

use crate::schema::BridgeConfig;
use webbridge_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BridgeConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    misc::validate_engine(&mut errors, config);
    misc::validate_host(&mut errors, config);
    misc::validate_window(&mut errors, config);
    misc::validate_defaults(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
