//! Window configuration for the windowed host.

use serde::{Deserialize, Serialize};

/// Size and title of the host window that carries the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Inner width in logical pixels (valid range: 200-8192).
    pub width: u32,
    /// Inner height in logical pixels (valid range: 200-8192).
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "webbridge".to_string(),
            width: 1024,
            height: 768,
        }
    }
}
