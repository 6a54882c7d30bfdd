//! Configuration schema types for webbridge.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod engine;
mod host;
mod system;
mod window;

pub use engine::*;
pub use host::*;
pub use system::*;
pub use window::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use webbridge_common::EngineKind;

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for webbridge.
///
/// `defaults` holds widget property values (keyed by property name, e.g.
/// `javaScriptEnabled`) applied to every new widget before the host's own
/// properties. A `[defaults.system]` or `[defaults.headless]` table holds
/// values for widgets on that engine only.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    pub engine: EngineConfig,
    pub host: HostConfig,
    pub window: WindowConfig,
    pub logging: LoggingConfig,
    pub defaults: BTreeMap<String, serde_json::Value>,
}

/// Keys under `[defaults]` that scope values to one engine.
pub const ENGINE_SCOPES: [&str; 2] = ["system", "headless"];

pub fn is_engine_scope(name: &str) -> bool {
    ENGINE_SCOPES.contains(&name)
}

impl BridgeConfig {
    /// Property defaults for a widget on `kind`: shared entries first, then
    /// the engine's own table on top.
    pub fn defaults_for(&self, kind: EngineKind) -> BTreeMap<String, Value> {
        let mut merged: BTreeMap<String, Value> = self
            .defaults
            .iter()
            .filter(|(name, _)| !is_engine_scope(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        if let Some(Value::Object(scoped)) = self.defaults.get(&kind.to_string()) {
            merged.extend(scoped.iter().map(|(name, value)| (name.clone(), value.clone())));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn engine_tables_override_shared_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
[defaults]
javaScriptEnabled = true
textZoom = 100

[defaults.headless]
textZoom = 150
"#,
        )
        .unwrap();

        let headless = config.defaults_for(EngineKind::Headless);
        assert_eq!(headless.get("textZoom"), Some(&json!(150)));
        assert_eq!(headless.get("javaScriptEnabled"), Some(&json!(true)));
        assert!(!headless.contains_key("headless"));

        let system = config.defaults_for(EngineKind::System);
        assert_eq!(system.get("textZoom"), Some(&json!(100)));
        assert_eq!(system.len(), 2);
    }
}
