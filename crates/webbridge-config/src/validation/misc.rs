//! Per-section validation: engine, host, window and property defaults.

use serde_json::Value;

use crate::schema::{is_engine_scope, BridgeConfig};

use super::helpers::validate_range;

/// Validate engine constraints.
pub(crate) fn validate_engine(errors: &mut Vec<String>, config: &BridgeConfig) {
    validate_range(errors, "engine.api_level", config.engine.api_level, 1, 40);
}

/// Validate host constraints.
pub(crate) fn validate_host(errors: &mut Vec<String>, config: &BridgeConfig) {
    validate_range(
        errors,
        "host.lifecycle_capacity",
        config.host.lifecycle_capacity,
        1,
        1024,
    );
}

/// Validate window constraints.
pub(crate) fn validate_window(errors: &mut Vec<String>, config: &BridgeConfig) {
    validate_range(errors, "window.width", config.window.width, 200, 8192);
    validate_range(errors, "window.height", config.window.height, 200, 8192);
    if config.window.title.trim().is_empty() {
        errors.push("window.title must not be empty".to_string());
    }
}

/// Validate widget property defaults. Only the shape is checked here; the
/// widget's property table validates values when they are applied.
pub(crate) fn validate_defaults(errors: &mut Vec<String>, config: &BridgeConfig) {
    for (name, value) in &config.defaults {
        if !is_engine_scope(name) {
            validate_default(errors, "defaults", name, value);
            continue;
        }
        match value {
            Value::Object(scoped) => {
                let section = format!("defaults.{name}");
                for (inner, value) in scoped {
                    validate_default(errors, &section, inner, value);
                }
            }
            _ => errors.push(format!("defaults.{name} must be a table of property values")),
        }
    }
}

fn validate_default(errors: &mut Vec<String>, section: &str, name: &str, value: &Value) {
    if name.trim().is_empty() {
        errors.push(format!("{section} contains an empty property name"));
    } else if name == "source" {
        errors.push(format!("{section}.source is not allowed; pass the source per widget"));
    } else if value.is_object() {
        errors.push(format!(
            "{section}.{name} must be a scalar or array, got a table"
        ));
    }
}
