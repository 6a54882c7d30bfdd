//! Engine selection and capability overrides.

use serde::{Deserialize, Serialize};
use webbridge_common::EngineKind;

/// Browser engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which backend new widgets are built on.
    pub kind: EngineKind,
    /// Enable the engine's developer tools (always on in debug builds).
    pub devtools: bool,
    /// Transparent widget background.
    pub transparent: bool,
    /// Emulated platform API level for the headless engine (valid range: 1-40).
    /// Below 19 the engine has no direct script evaluation.
    pub api_level: u32,
    pub force_dark_supported: bool,
    pub protected_media_supported: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::System,
            devtools: cfg!(debug_assertions),
            transparent: false,
            api_level: 33,
            force_dark_supported: true,
            protected_media_supported: true,
        }
    }
}
